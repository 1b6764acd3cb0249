//! Audio module - round-robin sfx channel ring
//!
//! Every `play` takes the channel under the cursor, assigns the clip, starts it
//! and advances the cursor by one, whether or not the previous sound on that
//! channel has finished. Overlapping more sounds than channels cuts the oldest
//! one off; dispatch stays O(1) and allocation-free.

use arrayvec::ArrayVec;

use crate::rng::SimpleRng;
use crate::types::{ClipId, Sfx, MAX_SFX_CHANNELS};

/// A playback slot.
pub trait AudioChannel {
    fn set_clip(&mut self, clip: ClipId);
    fn play(&mut self);
    fn stop(&mut self);
}

#[derive(Debug, Clone)]
pub struct AudioChannelRing<C> {
    channels: ArrayVec<C, MAX_SFX_CHANNELS>,
    cursor: usize,
}

impl<C: AudioChannel> AudioChannelRing<C> {
    /// Build a ring from up to `MAX_SFX_CHANNELS` channels; extras are dropped.
    pub fn new(channels: impl IntoIterator<Item = C>) -> Self {
        Self {
            channels: channels.into_iter().take(MAX_SFX_CHANNELS).collect(),
            cursor: 0,
        }
    }

    /// Play a sound on the next channel and return that channel's index.
    ///
    /// `LevelUp` draws one of its variants from `rng`; other categories never
    /// touch it.
    pub fn play(&mut self, sfx: Sfx, rng: &mut SimpleRng) -> Option<usize> {
        if self.channels.is_empty() {
            return None;
        }

        let variants = sfx.clip_variants();
        let variant = if variants > 1 {
            rng.next_range(variants)
        } else {
            0
        };

        let index = self.cursor;
        let channel = &mut self.channels[index];
        channel.set_clip(sfx.clip(variant));
        channel.play();
        self.cursor = (self.cursor + 1) % self.channels.len();
        Some(index)
    }

    pub fn stop_all(&mut self) {
        for channel in self.channels.iter_mut() {
            channel.stop();
        }
    }

    /// Channel the next `play` will use.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn channels(&self) -> &[C] {
        &self.channels
    }
}

/// A channel with no output device. It remembers what it was asked to do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MuteChannel {
    pub clip: Option<ClipId>,
    pub plays: u32,
    pub stops: u32,
    pub playing: bool,
}

impl AudioChannel for MuteChannel {
    fn set_clip(&mut self, clip: ClipId) {
        self.clip = Some(clip);
    }

    fn play(&mut self) {
        self.plays = self.plays.wrapping_add(1);
        self.playing = true;
        log::trace!("play clip {:?}", self.clip);
    }

    fn stop(&mut self) {
        self.stops = self.stops.wrapping_add(1);
        self.playing = false;
    }
}
