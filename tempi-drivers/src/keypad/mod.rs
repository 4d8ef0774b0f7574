//! Key matrix driver (seesaw keypad module)
//!
//! The firmware scans the matrix and queues edge events in a FIFO. Each key
//! has to be told which edges to report before it produces events.

pub mod event;

pub use event::{Edge, KeyEvent};

use core::fmt;

use heapless::Vec;
use tempi_seesaw::registers::keypad;
use tempi_seesaw::Seesaw;

/// Largest number of events fetched in one FIFO read
pub const MAX_EVENTS_PER_READ: usize = 32;

/// Settle delay for the FIFO depth read
const COUNT_DELAY_US: u32 = 500;

/// Settle delay for the FIFO read
const FIFO_DELAY_US: u32 = 2_000;

/// Errors that can occur with the keypad
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeypadError<E> {
    /// Reading the FIFO depth failed
    EventCount(E),
    /// Enabling or disabling the interrupt failed
    Interrupt { enable: bool, source: E },
    /// Configuring a key failed
    Configure { key: u8, source: E },
    /// Reading the FIFO failed
    ReadFifo { len: usize, source: E },
    /// Requested more events than a single read can fetch
    TooManyEvents { len: usize, max: usize },
}

impl<E: fmt::Debug> fmt::Display for KeypadError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeypadError::EventCount(e) => write!(f, "failed to read event count: {:?}", e),
            KeypadError::Interrupt { enable, source } => {
                write!(f, "failed to set keypad interrupt to {}: {:?}", enable, source)
            }
            KeypadError::Configure { key, source } => {
                write!(f, "failed to configure key {}: {:?}", key, source)
            }
            KeypadError::ReadFifo { len, source } => {
                write!(f, "failed to read {} events: {:?}", len, source)
            }
            KeypadError::TooManyEvents { len, max } => {
                write!(f, "too many events requested: {} > {}", len, max)
            }
        }
    }
}

/// Seesaw keypad
pub struct Keypad<S> {
    seesaw: S,
}

impl<S: Seesaw> Keypad<S> {
    pub fn new(seesaw: S) -> Self {
        Self { seesaw }
    }

    /// Number of pending events in the FIFO
    pub fn key_event_count(&mut self) -> Result<u8, KeypadError<S::Error>> {
        let mut buf = [0u8; 1];
        self.seesaw
            .read(keypad::COUNT, &mut buf, COUNT_DELAY_US)
            .map_err(KeypadError::EventCount)?;
        Ok(buf[0])
    }

    /// Enable or disable the key event interrupt
    ///
    /// Enable and disable are separate write-only registers.
    pub fn set_interrupt(&mut self, enable: bool) -> Result<(), KeypadError<S::Error>> {
        let register = if enable {
            keypad::INTENSET
        } else {
            keypad::INTENCLR
        };
        self.seesaw
            .write(register, &[0x01])
            .map_err(|source| KeypadError::Interrupt { enable, source })
    }

    /// Enable or disable reporting of one edge for a key
    pub fn configure_key(
        &mut self,
        key: u8,
        edge: Edge,
        enable: bool,
    ) -> Result<(), KeypadError<S::Error>> {
        // bit 0: enable, bits 1-4: edge mask
        let state = u8::from(enable) | (edge.mask() << 1);
        self.seesaw
            .write(keypad::EVENT, &[key, state])
            .map_err(|source| KeypadError::Configure { key, source })
    }

    /// Fill `events` from the FIFO
    ///
    /// Reads exactly `events.len()` bytes. Ask [`key_event_count`](Self::key_event_count)
    /// first; slots past the pending count come back as whatever the
    /// firmware sends for an empty FIFO.
    pub fn read(&mut self, events: &mut [KeyEvent]) -> Result<(), KeypadError<S::Error>> {
        if events.len() > MAX_EVENTS_PER_READ {
            return Err(KeypadError::TooManyEvents {
                len: events.len(),
                max: MAX_EVENTS_PER_READ,
            });
        }

        let mut raw = [0u8; MAX_EVENTS_PER_READ];
        let raw = &mut raw[..events.len()];
        self.seesaw
            .read(keypad::FIFO, raw, FIFO_DELAY_US)
            .map_err(|source| KeypadError::ReadFifo {
                len: events.len(),
                source,
            })?;

        for (event, &byte) in events.iter_mut().zip(raw.iter()) {
            *event = KeyEvent::decode(byte);
        }
        Ok(())
    }

    /// Drain up to [`MAX_EVENTS_PER_READ`] pending events
    pub fn read_pending(&mut self) -> Result<Vec<KeyEvent, MAX_EVENTS_PER_READ>, KeypadError<S::Error>> {
        let count = usize::from(self.key_event_count()?).min(MAX_EVENTS_PER_READ);

        let mut events = [KeyEvent::default(); MAX_EVENTS_PER_READ];
        if count > 0 {
            self.read(&mut events[..count])?;
        }

        Ok(events[..count].iter().copied().collect())
    }

    /// Give back the seesaw handle
    pub fn release(self) -> S {
        self.seesaw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use tempi_seesaw::Register;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Nack;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Op {
        Read(Register, usize, u32),
        Write(Register, std::vec::Vec<u8>),
    }

    /// Mock seesaw recording operations and answering reads from a script
    #[derive(Default)]
    struct MockSeesaw {
        ops: std::vec::Vec<Op>,
        responses: VecDeque<std::vec::Vec<u8>>,
        fail: bool,
    }

    impl Seesaw for MockSeesaw {
        type Error = Nack;

        fn read(&mut self, register: Register, buf: &mut [u8], delay_us: u32) -> Result<(), Nack> {
            self.ops.push(Op::Read(register, buf.len(), delay_us));
            if self.fail {
                return Err(Nack);
            }
            let bytes = self.responses.pop_front().ok_or(Nack)?;
            buf.copy_from_slice(&bytes);
            Ok(())
        }

        fn write(&mut self, register: Register, data: &[u8]) -> Result<(), Nack> {
            self.ops.push(Op::Write(register, data.to_vec()));
            if self.fail {
                return Err(Nack);
            }
            Ok(())
        }
    }

    fn keypad_with(responses: &[&[u8]]) -> Keypad<MockSeesaw> {
        Keypad::new(MockSeesaw {
            responses: responses.iter().map(|r| r.to_vec()).collect(),
            ..Default::default()
        })
    }

    #[test]
    fn test_key_event_count() {
        let mut pad = keypad_with(&[&[3]]);

        assert_eq!(pad.key_event_count().unwrap(), 3);
        assert_eq!(
            pad.release().ops,
            vec![Op::Read(keypad::COUNT, 1, COUNT_DELAY_US)]
        );
    }

    #[test]
    fn test_key_event_count_failure() {
        let mut pad = keypad_with(&[]);
        assert_eq!(pad.key_event_count(), Err(KeypadError::EventCount(Nack)));
    }

    #[test]
    fn test_set_interrupt_uses_separate_registers() {
        let mut pad = keypad_with(&[]);

        pad.set_interrupt(true).unwrap();
        pad.set_interrupt(false).unwrap();

        assert_eq!(
            pad.release().ops,
            vec![
                Op::Write(keypad::INTENSET, vec![0x01]),
                Op::Write(keypad::INTENCLR, vec![0x01]),
            ]
        );
    }

    #[test]
    fn test_set_interrupt_failure() {
        let mut pad = Keypad::new(MockSeesaw {
            fail: true,
            ..Default::default()
        });

        assert_eq!(
            pad.set_interrupt(false),
            Err(KeypadError::Interrupt {
                enable: false,
                source: Nack
            })
        );
    }

    #[test]
    fn test_configure_key() {
        let mut pad = keypad_with(&[]);

        pad.configure_key(7, Edge::Falling, true).unwrap();
        pad.configure_key(7, Edge::Rising, false).unwrap();
        pad.configure_key(0, Edge::High, true).unwrap();

        assert_eq!(
            pad.release().ops,
            vec![
                // enable | (0b0100 << 1)
                Op::Write(keypad::EVENT, vec![7, 0b0000_1001]),
                // (0b1000 << 1), enable bit clear
                Op::Write(keypad::EVENT, vec![7, 0b0001_0000]),
                Op::Write(keypad::EVENT, vec![0, 0b0000_0011]),
            ]
        );
    }

    #[test]
    fn test_configure_key_failure() {
        let mut pad = Keypad::new(MockSeesaw {
            fail: true,
            ..Default::default()
        });

        assert_eq!(
            pad.configure_key(12, Edge::Low, true),
            Err(KeypadError::Configure { key: 12, source: Nack })
        );
    }

    #[test]
    fn test_read_two_events() {
        // Key 3 falling, key 42 rising
        let raw: [u8; 2] = [(3 << 2) | 2, (42 << 2) | 3];
        let mut pad = keypad_with(&[&raw]);

        let mut events = [KeyEvent::default(); 2];
        pad.read(&mut events).unwrap();

        assert_eq!(events[0].raw(), raw[0]);
        assert_eq!(events[0].key(), 3);
        assert_eq!(events[0].edge(), Edge::Falling);
        assert_eq!(events[1].raw(), raw[1]);
        assert_eq!(events[1].key(), 42);
        assert_eq!(events[1].edge(), Edge::Rising);

        assert_eq!(
            pad.release().ops,
            vec![Op::Read(keypad::FIFO, 2, FIFO_DELAY_US)]
        );
    }

    #[test]
    fn test_read_too_many_events() {
        let mut pad = keypad_with(&[]);
        let mut events = [KeyEvent::default(); MAX_EVENTS_PER_READ + 1];

        assert_eq!(
            pad.read(&mut events),
            Err(KeypadError::TooManyEvents {
                len: MAX_EVENTS_PER_READ + 1,
                max: MAX_EVENTS_PER_READ
            })
        );
        assert!(pad.release().ops.is_empty());
    }

    #[test]
    fn test_read_failure() {
        let mut pad = keypad_with(&[]);
        let mut events = [KeyEvent::default(); 4];

        assert_eq!(
            pad.read(&mut events),
            Err(KeypadError::ReadFifo { len: 4, source: Nack })
        );
    }

    #[test]
    fn test_read_pending() {
        let mut pad = keypad_with(&[&[2], &[0x0A, 0x0F]]);

        let events = pad.read_pending().unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!((events[0].key(), events[0].edge()), (2, Edge::Falling));
        assert_eq!((events[1].key(), events[1].edge()), (3, Edge::Rising));
    }

    #[test]
    fn test_read_pending_empty_fifo() {
        let mut pad = keypad_with(&[&[0]]);

        assert!(pad.read_pending().unwrap().is_empty());
        // Only the count was read
        assert_eq!(pad.release().ops.len(), 1);
    }

    #[test]
    fn test_read_pending_caps_at_max() {
        let fifo = [0x05u8; MAX_EVENTS_PER_READ];
        let mut pad = keypad_with(&[&[50], &fifo]);

        let events = pad.read_pending().unwrap();

        assert_eq!(events.len(), MAX_EVENTS_PER_READ);
        assert_eq!(
            pad.release().ops[1],
            Op::Read(keypad::FIFO, MAX_EVENTS_PER_READ, FIFO_DELAY_US)
        );
    }
}
