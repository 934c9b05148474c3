//! PreviewGroup - several players, at most one audible
//!
//! Used for side-by-side style previews. Starting a member pauses every other
//! member first, so two previews never overlap.

use std::time::Duration;

use super::player::{PlayOutcome, PlayerShell};
use crate::media::{MediaBackend, SessionEvent};
use crate::visual::Surface;

pub struct PreviewGroup<B: MediaBackend, S: Surface> {
    members: Vec<PlayerShell<B, S>>,
}

impl<B: MediaBackend, S: Surface> Default for PreviewGroup<B, S> {
    fn default() -> Self {
        Self { members: Vec::new() }
    }
}

impl<B: MediaBackend, S: Surface> PreviewGroup<B, S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a member and return its index
    pub fn push(&mut self, player: PlayerShell<B, S>) -> usize {
        self.members.push(player);
        self.members.len() - 1
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PlayerShell<B, S>> {
        self.members.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut PlayerShell<B, S>> {
        self.members.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayerShell<B, S>> {
        self.members.iter()
    }

    /// Index of the member currently playing, if any
    pub fn playing(&self) -> Option<usize> {
        self.members.iter().position(|p| p.state().is_playing())
    }

    /// Pause everyone else, then play `index`. `None` for a bad index.
    pub fn play(&mut self, index: usize) -> Option<PlayOutcome> {
        if index >= self.members.len() {
            return None;
        }
        for (i, member) in self.members.iter_mut().enumerate() {
            if i != index {
                member.pause();
            }
        }
        log::debug!("preview {} selected", index);
        Some(self.members[index].play())
    }

    pub fn pause_all(&mut self) {
        for member in self.members.iter_mut() {
            member.pause();
        }
    }

    /// Play `index` unless it is playing or about to, in which case pause it
    pub fn toggle(&mut self, index: usize) -> Option<PlayOutcome> {
        let member = self.members.get_mut(index)?;
        if member.state().is_playing() || member.session().is_play_pending() {
            member.pause();
            None
        } else {
            self.play(index)
        }
    }

    /// Tick every member; events come back tagged with the member index
    pub fn tick(&mut self) -> Vec<(usize, SessionEvent)> {
        let mut events = Vec::new();
        for (i, member) in self.members.iter_mut().enumerate() {
            events.extend(member.tick().into_iter().map(|e| (i, e)));
        }

        // A deferred start on one member still has to silence the others
        let started: Vec<usize> = events
            .iter()
            .filter(|(_, e)| matches!(e, SessionEvent::Started))
            .map(|(i, _)| *i)
            .collect();
        if let Some(&latest) = started.last() {
            for (i, member) in self.members.iter_mut().enumerate() {
                if i != latest {
                    member.pause();
                }
            }
        }
        events
    }

    pub fn animation_frame(&mut self, elapsed: Duration) {
        for member in self.members.iter_mut() {
            member.animation_frame(elapsed);
        }
    }

    pub fn unmount_all(&mut self) {
        for member in self.members.iter_mut() {
            member.unmount();
        }
    }
}
