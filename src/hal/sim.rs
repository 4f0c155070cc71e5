//! Simulated VideoCore firmware for host tests.
//!
//! Decodes the property buffer the way the real firmware does, answers the
//! framebuffer tags, and echoes the posted word back on the read register.

use std::collections::VecDeque;

use crate::hal::mailbox::{
    tags, MailboxPort, BUFFER_WORDS, END_TAG, RESPONSE_ERROR, RESPONSE_SUCCESS, STATUS_EMPTY,
    STATUS_FULL, TAG_RESPONSE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    /// Answer every tag. `pitch: None` reports a tightly packed row.
    Accept { framebuffer: u32, pitch: Option<u32> },
    /// Leave the tags alone and report `RESPONSE_ERROR`.
    Reject,
    /// Report an arbitrary response code.
    Code(u32),
    /// Never answer.
    Silent,
}

impl Default for Reply {
    fn default() -> Self {
        Reply::Accept {
            framebuffer: SimulatedFirmware::DEFAULT_FRAMEBUFFER,
            pitch: None,
        }
    }
}

pub struct SimulatedFirmware {
    reply: Reply,
    buffer: *mut u32,
    outbox: VecDeque<u32>,
    posted: Vec<u32>,
    requests: Vec<Vec<u32>>,
    full_polls: u32,
    status_polls: u32,
}

impl SimulatedFirmware {
    pub const BUS_ADDRESS: u32 = 0x0008_1000;
    /// GPU bus address with the L2-cached alias bits set
    pub const DEFAULT_FRAMEBUFFER: u32 = 0xC010_0000;
    pub const DEFAULT_PITCH: u32 = 5120;

    pub fn new(reply: Reply) -> Self {
        Self {
            reply,
            buffer: core::ptr::null_mut(),
            outbox: VecDeque::new(),
            posted: Vec::new(),
            requests: Vec::new(),
            full_polls: 0,
            status_polls: 0,
        }
    }

    /// Leave a word for another channel in the read FIFO.
    pub fn queue_foreign(&mut self, word: u32) {
        self.outbox.push_back(word);
    }

    /// Report `STATUS_FULL` for the next `polls` status reads.
    pub fn stay_full_for(&mut self, polls: u32) {
        self.full_polls = polls;
    }

    /// Every word written to the write register.
    pub fn posted(&self) -> &[u32] {
        &self.posted
    }

    /// Snapshot of each request buffer as it was posted.
    pub fn requests(&self) -> &[Vec<u32>] {
        &self.requests
    }

    pub fn pending(&self) -> usize {
        self.outbox.len()
    }

    pub fn status_polls(&self) -> u32 {
        self.status_polls
    }

    fn answer(&mut self) {
        // SAFETY: `bus_address` handed us the buffer of the call in flight
        let words = unsafe { std::slice::from_raw_parts_mut(self.buffer, BUFFER_WORDS) };
        let total = (words[0] as usize / 4).min(BUFFER_WORDS);
        self.requests.push(words[..total].to_vec());

        let (framebuffer, pitch) = match self.reply {
            Reply::Accept { framebuffer, pitch } => (framebuffer, pitch),
            Reply::Reject => {
                words[1] = RESPONSE_ERROR;
                return;
            }
            Reply::Code(code) => {
                words[1] = code;
                return;
            }
            Reply::Silent => return,
        };

        let mut width = None;
        let mut i = 2;
        while i + 2 < total && words[i] != END_TAG {
            let value_words = words[i + 1] as usize / 4;
            let values = i + 3;
            match words[i] {
                tags::SET_PHYSICAL_SIZE => width = Some(words[values]),
                tags::ALLOCATE_BUFFER => {
                    words[values] = framebuffer;
                    words[values + 1] = 0x0080_0000;
                }
                tags::GET_PITCH => {
                    words[values] = pitch
                        .or(width.map(|w| w * 4))
                        .unwrap_or(Self::DEFAULT_PITCH);
                }
                // set tags answer with the values they applied
                _ => {}
            }
            words[i + 2] = TAG_RESPONSE | (value_words * 4) as u32;
            i = values + value_words;
        }
        words[1] = RESPONSE_SUCCESS;
    }
}

impl MailboxPort for SimulatedFirmware {
    fn read_status(&mut self) -> u32 {
        self.status_polls += 1;
        let mut status = 0;
        if self.full_polls > 0 {
            self.full_polls -= 1;
            status |= STATUS_FULL;
        }
        if self.outbox.is_empty() {
            status |= STATUS_EMPTY;
        }
        status
    }

    fn write_data(&mut self, value: u32) {
        self.posted.push(value);
        if value & !0xF != Self::BUS_ADDRESS || self.buffer.is_null() {
            return;
        }
        self.answer();
        if self.reply != Reply::Silent {
            self.outbox.push_back(value);
        }
    }

    fn read_data(&mut self) -> u32 {
        self.outbox.pop_front().unwrap_or(0)
    }

    fn bus_address(&mut self, buffer: *mut u32) -> u32 {
        self.buffer = buffer;
        Self::BUS_ADDRESS
    }
}
