//! Sound cues and their tone recipes.
//!
//! Game logic only queues [`SoundCue`]s. The browser entry point drains the
//! queue each frame and hands the cues to [`AudioPlayer`], which synthesises
//! them with Web Audio oscillators. Audio never reports back to the game.

/// Audible events raised by the game.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SoundCue {
    Flip,
    /// Successful match at the given streak; the chime rises with it.
    Match(u32),
    PlayerAttack,
    EnemyHit,
    Mismatch,
    EnemyAttack,
    PlayerHit,
    Victory,
    Defeat,
    Champion,
    /// Combo sparkle for streaks of two or more.
    Combo(u32),
    LevelUp,
    /// Browsers start the audio context suspended until a user gesture.
    ResumeAudio,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// A single oscillator note.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tone {
    /// Start frequency in Hz.
    pub frequency: f32,
    /// Exponential sweep target, if any.
    pub frequency_end: Option<f32>,
    /// Seconds.
    pub duration: f64,
    pub waveform: Waveform,
    pub volume: f32,
    /// Delay from the cue in seconds.
    pub offset: f64,
}

impl Tone {
    const fn new(frequency: f32, duration: f64, waveform: Waveform, volume: f32) -> Self {
        Self {
            frequency,
            frequency_end: None,
            duration,
            waveform,
            volume,
            offset: 0.0,
        }
    }

    const fn sweep_to(mut self, frequency_end: f32) -> Self {
        self.frequency_end = Some(frequency_end);
        self
    }

    const fn at(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }
}

/// Notes played one after another, `step` seconds apart.
fn arpeggio(notes: &[f32], step: f64, duration: f64, waveform: Waveform, volume: f32) -> Vec<Tone> {
    notes
        .iter()
        .enumerate()
        .map(|(i, &f)| Tone::new(f, duration, waveform, volume).at(i as f64 * step))
        .collect()
}

/// The tones that make up a cue.
pub fn tones(cue: SoundCue) -> Vec<Tone> {
    use Waveform::*;

    match cue {
        SoundCue::Flip => vec![Tone::new(800.0, 0.05, Square, 0.15)],
        SoundCue::Match(combo) => {
            let base = 400.0 + combo as f32 * 50.0;
            vec![
                Tone::new(base, 0.1, Sine, 0.25),
                Tone::new(base * 1.25, 0.1, Sine, 0.25).at(0.08),
                Tone::new(base * 1.5, 0.15, Sine, 0.25).at(0.16),
            ]
        }
        SoundCue::PlayerAttack => vec![Tone::new(200.0, 0.2, Sawtooth, 0.2).sweep_to(100.0)],
        SoundCue::EnemyHit => vec![
            Tone::new(150.0, 0.15, Square, 0.3),
            Tone::new(80.0, 0.2, Sine, 0.25),
        ],
        SoundCue::Mismatch => vec![Tone::new(300.0, 0.15, Square, 0.2).sweep_to(150.0)],
        SoundCue::EnemyAttack => vec![Tone::new(100.0, 0.25, Sawtooth, 0.25).sweep_to(300.0)],
        SoundCue::PlayerHit => vec![
            Tone::new(200.0, 0.1, Square, 0.3),
            Tone::new(100.0, 0.2, Sine, 0.25).at(0.05),
        ],
        // C5 E5 G5 C6
        SoundCue::Victory => arpeggio(&[523.0, 659.0, 784.0, 1047.0], 0.15, 0.2, Sine, 0.25),
        SoundCue::Defeat => arpeggio(&[400.0, 350.0, 300.0, 200.0], 0.2, 0.25, Sawtooth, 0.2),
        SoundCue::Champion => {
            let melody = [523.0, 659.0, 784.0, 659.0, 784.0, 1047.0];
            let mut out = arpeggio(&melody, 0.18, 0.25, Sine, 0.3);
            let bass: Vec<f32> = melody.iter().map(|f| f / 2.0).collect();
            out.extend(arpeggio(&bass, 0.18, 0.25, Triangle, 0.15));
            out
        }
        SoundCue::Combo(combo) if combo >= 2 => {
            let f = 600.0 + combo as f32 * 100.0;
            vec![
                Tone::new(f, 0.1, Triangle, 0.2),
                Tone::new(f * 1.5, 0.15, Sine, 0.15),
            ]
        }
        SoundCue::Combo(_) => Vec::new(),
        SoundCue::LevelUp => arpeggio(&[400.0, 500.0, 600.0, 800.0], 0.1, 0.15, Sine, 0.25),
        SoundCue::ResumeAudio => Vec::new(),
    }
}

/// Web Audio playback. A missing or failing audio context makes every
/// call a no-op.
pub struct AudioPlayer {
    ctx: Option<web_sys::AudioContext>,
}

impl AudioPlayer {
    pub fn new() -> Self {
        let ctx = match web_sys::AudioContext::new() {
            Ok(ctx) => Some(ctx),
            Err(e) => {
                web_sys::console::warn_1(
                    &format!("Battle Card Matcher: AudioContext を作成できません（無音で続行）: {e:?}")
                        .into(),
                );
                None
            }
        };
        Self { ctx }
    }

    pub fn play(&self, cue: SoundCue) {
        let Some(ctx) = &self.ctx else {
            return;
        };
        if cue == SoundCue::ResumeAudio {
            if ctx.state() == web_sys::AudioContextState::Suspended {
                // The returned promise only signals completion; nothing awaits it.
                let _ = ctx.resume();
            }
            return;
        }
        for tone in tones(cue) {
            if play_tone(ctx, &tone).is_none() {
                web_sys::console::warn_1(&format!("Battle Card Matcher: {cue:?} の再生に失敗").into());
                return;
            }
        }
    }
}

fn play_tone(ctx: &web_sys::AudioContext, tone: &Tone) -> Option<()> {
    use web_sys::OscillatorType;

    let osc = ctx.create_oscillator().ok()?;
    let gain = ctx.create_gain().ok()?;
    osc.connect_with_audio_node(&gain).ok()?;
    gain.connect_with_audio_node(&ctx.destination()).ok()?;

    osc.set_type(match tone.waveform {
        Waveform::Sine => OscillatorType::Sine,
        Waveform::Square => OscillatorType::Square,
        Waveform::Sawtooth => OscillatorType::Sawtooth,
        Waveform::Triangle => OscillatorType::Triangle,
    });

    let start = ctx.current_time() + tone.offset;
    let end = start + tone.duration;
    let freq = osc.frequency();
    freq.set_value_at_time(tone.frequency, start).ok()?;
    if let Some(target) = tone.frequency_end {
        freq.exponential_ramp_to_value_at_time(target, end).ok()?;
    }
    let volume = gain.gain();
    volume.set_value_at_time(tone.volume, start).ok()?;
    volume.exponential_ramp_to_value_at_time(0.01, end).ok()?;

    let source: &web_sys::AudioScheduledSourceNode = &osc;
    source.start_with_when(start).ok()?;
    source.stop_with_when(end).ok()?;
    Some(())
}
