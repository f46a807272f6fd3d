//! Wavescope - renders audio into synchronized visuals
//!
//! Reads a WAV file (or the default capture device) and paints a chosen
//! visual preset into a PNG frame sequence, one frame per tick.

use std::thread;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use wavescope::canvas::Canvas;
use wavescope::cli::Args;
use wavescope::engine::Visualizer;
use wavescope::error::{Result, VisualizerError};
use wavescope::preset;
use wavescope::spectrum::live::LiveInput;
use wavescope::spectrum::wav::WavPlayback;
use wavescope::spectrum::SpectrumSource;

/// FFT window size used by the binary; presets are tuned against its bin
/// resolution
const FFT_SIZE: usize = 1024;

/// Fallback render length for live capture with no explicit duration
const DEFAULT_LIVE_SECS: f32 = 10.0;

fn main() {
    println!("Wavescope - audio-reactive visualizer");

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    args.surface_config().validate()?;

    // Build the spectrum source and work out how long to render
    let (mut source, fallback_duration): (Box<dyn SpectrumSource>, f32) = if args.live {
        let live = LiveInput::open(FFT_SIZE)?;
        (Box::new(live), DEFAULT_LIVE_SECS)
    } else {
        let input = args.input.as_ref().expect("clap enforces input without --live");
        let playback = WavPlayback::open(input, FFT_SIZE, args.fps)?;
        let duration = playback.duration_secs();
        (Box::new(playback), duration)
    };

    let recording = args.recording_config(fallback_duration);
    std::fs::create_dir_all(recording.frames_dir())?;

    let mut canvas = Canvas::new(args.width, args.height)
        .ok_or_else(|| VisualizerError::Config("could not allocate surface".into()))?;
    let mut visualizer = Visualizer::new(preset::build(&args.preset));

    println!("Preset: {}", args.preset);
    println!(
        "Rendering {} frames at {}x{} into {}/\n",
        recording.total_frames(),
        args.width,
        args.height,
        recording.frames_dir()
    );

    let frame_interval = Duration::from_secs_f32(1.0 / args.fps.max(1) as f32);
    let mut rendered = 0;

    for frame in 0..recording.total_frames() {
        let Some(spectrum) = source.next_frame() else {
            break;
        };

        visualizer.render_frame(&spectrum, &mut canvas);
        canvas
            .pixmap()
            .save_png(recording.frame_path(frame))
            .map_err(|e| VisualizerError::Png(e.to_string()))?;
        rendered += 1;

        if frame % args.fps.max(1) as usize == 0 {
            tracing::info!(frame, total = recording.total_frames(), "rendering");
        }

        // Live capture runs in real time; file rendering goes flat out
        if args.live {
            thread::sleep(frame_interval);
        }
    }

    println!("Rendered {rendered} frames to {}", recording.frames_dir());
    Ok(())
}
