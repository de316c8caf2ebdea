//! Short synthesized cues through WebAudio.

use std::cell::RefCell;

use web_sys::{AudioContext, AudioScheduledSourceNode, OscillatorType};

use crate::session::{Cue, SoundPlayer};

const VOLUME: f32 = 0.05;

/// Frequency (Hz) and length (s) of a cue.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tone {
    pub frequency: f32,
    pub seconds: f64,
}

impl Tone {
    pub fn for_cue(cue: Cue) -> Self {
        match cue {
            Cue::Jump => Tone { frequency: 440.0, seconds: 0.1 },
            Cue::GeneEdit => Tone { frequency: 660.0, seconds: 0.2 },
            Cue::GameOver => Tone { frequency: 220.0, seconds: 0.5 },
        }
    }
}

/// Lazily opens its `AudioContext` on the first cue (browsers only allow it after a
/// user gesture anyway).
#[derive(Default)]
pub struct WebAudio {
    ctx: RefCell<Option<AudioContext>>,
}

impl WebAudio {
    fn context(&self) -> Option<AudioContext> {
        let mut slot = self.ctx.borrow_mut();
        if slot.is_none() {
            match AudioContext::new() {
                Ok(ctx) => *slot = Some(ctx),
                Err(e) => {
                    log::warn!("AudioContext unavailable: {e:?}");
                    return None;
                }
            }
        }
        slot.clone()
    }

    fn play_tone(&self, tone: Tone) -> Result<(), wasm_bindgen::JsValue> {
        let Some(ctx) = self.context() else {
            return Ok(());
        };
        let osc = ctx.create_oscillator()?;
        let gain = ctx.create_gain()?;
        osc.connect_with_audio_node(&gain)?;
        gain.connect_with_audio_node(&ctx.destination())?;

        let t0 = ctx.current_time();
        osc.set_type(OscillatorType::Sine);
        osc.frequency().set_value_at_time(tone.frequency, t0)?;
        let g = gain.gain();
        g.set_value_at_time(0.0, t0)?;
        g.linear_ramp_to_value_at_time(VOLUME, t0 + 0.01)?;
        g.exponential_ramp_to_value_at_time(0.001, t0 + tone.seconds)?;
        let source: &AudioScheduledSourceNode = &osc;
        source.start_with_when(t0)?;
        source.stop_with_when(t0 + tone.seconds)?;
        Ok(())
    }
}

impl SoundPlayer for WebAudio {
    fn play(&self, cue: Cue) {
        if let Err(e) = self.play_tone(Tone::for_cue(cue)) {
            log::warn!("could not play {cue:?}: {e:?}");
        }
    }
}
