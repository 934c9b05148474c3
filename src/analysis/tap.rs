//! Output tap - lock-free copy of the audible signal for analysis
//!
//! The writer lives in the audio callback and never blocks: when the reader
//! falls behind, the newest samples are dropped rather than stalling output.

use rtrb::{Consumer, Producer, PushError, RingBuffer};

/// Create a connected writer/reader pair holding up to `capacity` samples
pub fn sample_tap(capacity: usize) -> (TapWriter, SampleTap) {
    let (tx, rx) = RingBuffer::<f32>::new(capacity.max(1));
    (TapWriter { tx }, SampleTap { rx })
}

/// Audio-thread side of the tap
pub struct TapWriter {
    tx: Producer<f32>,
}

impl TapWriter {
    /// Push a block of mono samples, dropping whatever does not fit
    pub fn write(&mut self, block: &[f32]) {
        for &s in block {
            if let Err(PushError::Full(_)) = self.tx.push(s) {
                break;
            }
        }
    }

    /// True once the reading side has been dropped
    pub fn is_abandoned(&self) -> bool {
        self.tx.is_abandoned()
    }
}

/// Reading side of the tap, owned by the analysis graph
pub struct SampleTap {
    rx: Consumer<f32>,
}

impl SampleTap {
    /// Move every available sample into `sink`. Never waits.
    pub fn drain(&mut self, mut sink: impl FnMut(f32)) -> usize {
        let mut count = 0;
        while let Ok(s) = self.rx.pop() {
            sink(s);
            count += 1;
        }
        count
    }

    pub fn available(&self) -> usize {
        self.rx.slots()
    }
}

impl std::fmt::Debug for SampleTap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SampleTap")
            .field("available", &self.available())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_returns_samples_in_order() {
        let (mut writer, mut tap) = sample_tap(8);
        writer.write(&[0.1, 0.2, 0.3]);
        let mut out = Vec::new();
        assert_eq!(tap.drain(|s| out.push(s)), 3);
        assert_eq!(out, vec![0.1, 0.2, 0.3]);
        assert_eq!(tap.drain(|_| {}), 0);
    }

    #[test]
    fn overflow_drops_instead_of_blocking() {
        let (mut writer, tap) = sample_tap(4);
        writer.write(&[1.0; 10]);
        assert_eq!(tap.available(), 4);
    }

    #[test]
    fn writer_sees_dropped_reader() {
        let (writer, tap) = sample_tap(4);
        drop(tap);
        assert!(writer.is_abandoned());
    }
}
