//! Built-in scenarios for the audio and video tools of the backend

use std::time::Duration;

use super::scenario::Scenario;

/// Name of the built-in suite
pub const AUDIO_SUITE: &str = "Audio generation tools";

/// Directory the backend writes generated files into
const OUTPUT_DIR: &str = "outputs";

fn output(file: &str) -> String {
    format!("{}/{}", OUTPUT_DIR, file)
}

/// Two voices, two sound effects, two music pieces
pub fn audio_suite() -> Vec<Scenario> {
    vec![
        Scenario::text(
            "Text-to-Speech with Rachel (Default Voice)",
            "Generate speech: 'Welcome to my video editing platform. This is a test of the Eleven Labs text-to-speech integration.'",
        )
        .expecting(output("test_tts_rachel.mp3")),
        Scenario::text(
            "Text-to-Speech with Male Voice (Drew)",
            "Generate speech with Drew's voice: 'This is Drew speaking. Testing male voice generation with Eleven Labs.'",
        )
        .expecting(output("test_tts_drew.mp3")),
        Scenario::text(
            "Sound Effect Generation",
            "Generate a sound effect: 'cinematic explosion with deep rumble and debris falling'",
        )
        .expecting(output("test_explosion_sfx.mp3")),
        Scenario::text(
            "Sound Effect - Door Creak",
            "Create a sound effect of an old wooden door creaking open slowly",
        )
        .expecting(output("test_door_creak.mp3")),
        Scenario::text(
            "Music Generation - Upbeat Electronic",
            "Generate 20 seconds of upbeat electronic dance music at 120 BPM with synth and drums",
        )
        .expecting(output("test_edm_music.mp3")),
        Scenario::text(
            "Music Generation - Calm Piano",
            "Generate 15 seconds of peaceful piano meditation music",
        )
        .expecting(output("test_piano_music.mp3")),
    ]
}

pub fn quick_tts() -> Scenario {
    Scenario::text(
        "Quick TTS Test",
        "Generate speech: 'This is a quick test of text to speech.'",
    )
    .expecting(output("quick_test.mp3"))
}

pub fn quick_sfx() -> Scenario {
    Scenario::text(
        "Quick SFX Test",
        "Generate a sound effect: 'whoosh transition sound'",
    )
    .expecting(output("quick_sfx.mp3"))
}

/// Multi-step video edit sent as an envelope, with a tighter frame cap
pub fn multi_step() -> Scenario {
    Scenario::envelope(
        "Multi-Step Video Edit",
        "Please analyze the video at test_videos/sample.mp4 and then make it black and white and also add an overlay text at the center saying 'I love playing chess'",
    )
    .with_description("Analysis followed by two edits in one request")
    .with_timeout(Duration::from_secs(300))
    .with_max_frames(20)
}

/// Look up a quick scenario by its short name
pub fn quick(name: &str) -> Option<Scenario> {
    match name {
        "tts" => Some(quick_tts()),
        "sfx" => Some(quick_sfx()),
        "multi-step" | "multi_step" => Some(multi_step()),
        _ => None,
    }
}

/// Short names accepted by [`quick`]
pub const QUICK_NAMES: [&str; 3] = ["tts", "sfx", "multi-step"];
