// What you SEE:
// • The photo as a black/white stencil, cropped (never scaled) to 1024x600.
// • Hold Left Mouse: paint a green "pending" zone.
// • Move the Threshold slider: green zones turn blue and keep the look they
//   had before the slider moved. Other sliders never freeze anything.
// • Right drag (or arrows) pans. E toggles eraser (red preview; wipes green
//   and blue). S saves the stencil, C clears all zones, Esc/Q quits.

use clap::Parser;
use tracing::{debug, error, info, warn};

use pochoir::brush::{BrushEngine, Intent};
use pochoir::compose::draw_brush_preview;
use pochoir::config::{Args, PANEL_H, VIEW_H, VIEW_W};
use pochoir::draw::{Command, Drawer};
use pochoir::export::StencilSink;
use pochoir::panel::ControlPanel;
use pochoir::params::ParamWatch;
use pochoir::source::SourceImage;
use pochoir::types::FrameBuffer;
use pochoir::{Error, Session};

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    /* --- Load the photo ---
       A bad file stops here, before any window or state exists. */
    let source = SourceImage::open(&args.input)?;
    let mut sink = StencilSink::new(args.output_dir(), source.stem());

    /* --- Session + surfaces ---
       Visual: window opens on the stencil rendered with the initial sliders. */
    let initial = args.initial_controls();
    let mut session = Session::new(source.gray, &initial.filter, VIEW_W as u32, VIEW_H as u32);
    let mut drawer = Drawer::new("Pochoir", VIEW_W, VIEW_H + PANEL_H)?;
    let mut screen = FrameBuffer::new(VIEW_W, VIEW_H + PANEL_H);
    let mut panel = ControlPanel::new(&initial, VIEW_H);
    let mut brush = BrushEngine::new();

    // Threshold changes are the freeze controller's business; this one only logs the rest.
    let f = &initial.filter;
    let mut others = ParamWatch::new((f.simplify, f.median, f.isolate, initial.brush));

    /* ------------------------------ Main loop ------------------------------ */
    let reason = loop {
        if !drawer.is_open() {
            break "window closed";
        }

        /* 1) Poll the sliders. */
        let controls = panel.controls();
        let filter = controls.filter;
        if let Some(change) = others.observe((filter.simplify, filter.median, filter.isolate, controls.brush)) {
            debug!(?change, "simplify/median/isolate/brush changed, nothing frozen");
        }

        /* 2) Tick: commit on threshold change, re-filter, compose.
           Visual: blue zones stay put; everything else follows the sliders. */
        session.tick(&filter);

        /* 3) Draw: stencil crop with tints, brush preview, slider strip. */
        session.render_view(&mut screen);
        if let (false, Some((x, y))) = (brush.is_stroking(), brush.hover()) {
            if y < VIEW_H as i32 {
                draw_brush_preview(&mut screen, x, y, controls.brush, brush.mode());
            }
        }
        panel.draw(&mut screen, brush.mode(), sink.saved());

        /* 4) Present. This is also the bounded wait where input piles up. */
        if let Err(e) = drawer.present(&screen) {
            warn!(error = %e, "display surface lost");
            break "display surface lost";
        }

        /* 5) Keyboard commands. */
        let mut quit = false;
        for cmd in drawer.commands() {
            match cmd {
                Command::Quit => quit = true,
                Command::ToggleErase => {
                    let mode = brush.toggle_erase();
                    info!(?mode, "brush mode");
                }
                Command::Save => {
                    // The stencil from this tick, without overlays.
                    if let Err(e) = sink.save(session.stencil()) {
                        error!(error = %e, "export failed, keep editing");
                    }
                }
                Command::Clear => session.clear(),
                Command::Pan { dx, dy } => session.apply(Intent::PanBy { dx, dy }),
            }
        }
        if quit {
            break "quit requested";
        }

        /* 6) Pointer: the strip takes its drags, everything else goes to the brush.
           Visual: green paint / erased zones appear on the next frame. */
        for event in drawer.poll_pointer() {
            if panel.handle(event) {
                continue;
            }
            if let Some(intent) = brush.handle(event, controls.brush, session.viewport()) {
                session.apply(intent);
            }
        }
    };

    info!(reason, "shutting down");
    Ok(())
}
