//! # Protocol State Machine
//!
//! Interprets a captured job opcode by opcode and paints into a [`Surface`].
//!
//! ## Phases
//!
//! ```text
//! Preamble ──ESC──► Dispatch ──► Halted(EndOfStream | NullTerminator | Truncated | Cancelled)
//!    │                 │
//!    └─ end of data ───┤
//!                      └───────► Failed(DecodeError)
//! ```
//!
//! 1. **Preamble**: bytes before the first ESC are vendor banners. They are
//!    traced and dropped.
//! 2. **Dispatch**: the byte under the cursor selects a command; once it is
//!    handled the next byte is read as the following opcode.
//!
//! [`Decoder::step`] processes at most `budget` opcodes, so a host can
//! interleave decoding with other work and stop between batches.

use crate::printer::PrinterConfig;
use crate::protocol::commands::{BIT_IMAGE_MODE_24, COMPRESSION_RLE, ESC};
use crate::protocol::{ByteCursor, EscCommand, InfoCommand, Opcode, rle};
use crate::render::{STRIP_HEIGHT, Surface};

use super::options::DecodeOptions;
use super::state::DecoderState;
use super::trace::{Discard, TraceEvent, TraceSink};
use super::{DecodeError, DecodeErrorKind, DecodeFailure, Decoded, Halt};

/// Marker column painted right of every raster line strip.
pub const RASTER_FILLER: u8 = 0xAA;

/// Filler strips painted right of a `Z` blank line, whatever the model
/// clears (384 dots).
pub const BLANK_LINE_FILLER_STRIPS: usize = 48;

/// Marker column painted right of every bit-image column.
pub const BIT_IMAGE_FILLER: u8 = 0x55;

/// Result of one [`Decoder::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// More opcodes remain
    Continue,
    /// Decoding finished normally
    Halted(Halt),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Preamble,
    Dispatch,
    Halted(Halt),
    Failed(DecodeError),
}

/// Why a command handler stopped early.
enum Stop {
    Halt(Halt),
    Error(DecodeError),
}

impl From<DecodeError> for Stop {
    fn from(error: DecodeError) -> Self {
        Stop::Error(error)
    }
}

/// Resumable decoder for one captured job.
pub struct Decoder<'a, S: TraceSink = Discard> {
    cursor: ByteCursor<'a>,
    state: DecoderState,
    surface: Surface,
    config: PrinterConfig,
    options: DecodeOptions,
    sink: S,
    phase: Phase,
    /// Opcode byte waiting to be dispatched and its offset
    lookahead: Option<(usize, u8)>,
    /// Offset of the opcode currently being handled
    opcode_position: usize,
    opcodes: usize,
}

impl<'a> Decoder<'a, Discard> {
    /// Create a decoder that keeps no trace.
    pub fn new(buffer: &'a [u8], options: &DecodeOptions) -> Self {
        Self::with_sink(buffer, options, Discard)
    }
}

impl<'a, S: TraceSink> Decoder<'a, S> {
    /// Create a decoder that reports every token to `sink`.
    pub fn with_sink(buffer: &'a [u8], options: &DecodeOptions, sink: S) -> Self {
        Self {
            cursor: ByteCursor::new(buffer),
            state: DecoderState::default(),
            surface: Surface::new(options.max_width, options.max_height),
            config: options.model.config(),
            options: options.clone(),
            sink,
            phase: Phase::Preamble,
            lookahead: None,
            opcode_position: 0,
            opcodes: 0,
        }
    }

    #[inline]
    pub fn state(&self) -> &DecoderState {
        &self.state
    }

    #[inline]
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Offset of the next unread byte.
    #[inline]
    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    /// Number of opcodes dispatched so far.
    #[inline]
    pub fn opcodes(&self) -> usize {
        self.opcodes
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Halted(_) | Phase::Failed(_))
    }

    /// Process up to `budget` opcodes.
    ///
    /// The preamble is skipped on the first call and does not count against
    /// the budget. After a halt or an error every further call returns the
    /// same outcome.
    pub fn step(&mut self, budget: usize) -> Result<Step, DecodeError> {
        match self.phase {
            Phase::Halted(halt) => return Ok(Step::Halted(halt)),
            Phase::Failed(error) => return Err(error),
            Phase::Preamble => {
                self.skip_preamble();
                self.phase = Phase::Dispatch;
            }
            Phase::Dispatch => {}
        }

        for _ in 0..budget.max(1) {
            let Some((position, byte)) = self.lookahead else {
                return Ok(self.halt(Halt::EndOfStream));
            };

            self.opcode_position = position;
            self.opcodes += 1;
            match self.dispatch(byte) {
                Ok(()) => {}
                Err(Stop::Halt(halt)) => return Ok(self.halt(halt)),
                Err(Stop::Error(error)) => {
                    self.trace(error.position, || error.to_string());
                    self.phase = Phase::Failed(error);
                    return Err(error);
                }
            }

            self.lookahead = self.read_opcode();
        }

        if self.lookahead.is_none() {
            return Ok(self.halt(Halt::EndOfStream));
        }
        Ok(Step::Continue)
    }

    /// Run to completion.
    pub fn run(mut self) -> Result<Decoded, DecodeFailure> {
        let budget = self.options.batch_size;
        loop {
            match self.step(budget) {
                Ok(Step::Continue) => {}
                Ok(Step::Halted(_)) => return Ok(self.finish()),
                Err(error) => {
                    log::warn!("Decode aborted: {}", error);
                    return Err(DecodeFailure {
                        error,
                        partial: Box::new(self.finish()),
                    });
                }
            }
        }
    }

    /// Stop decoding and crop the surface to `[0, xmax) x [0, ymax)`.
    ///
    /// A decoder that has not halted yet is reported as [`Halt::Cancelled`].
    pub fn finish(mut self) -> Decoded {
        let halt = match self.phase {
            Phase::Halted(halt) => halt,
            Phase::Failed(error) => Halt::Aborted {
                position: error.position,
            },
            Phase::Preamble | Phase::Dispatch => Halt::Cancelled,
        };

        let width = self.state.xmax() as u32;
        let height = self.state.ymax() as u32;
        let position = self.cursor.position();
        self.trace(position, || format!("finished: {}, image {}x{}", halt, width, height));

        if self.options.compression_hint && !self.state.compression() {
            log::warn!("Compression was expected but the stream never sent M 2");
        }
        if self.surface.clipped_strips() > 0 {
            log::warn!(
                "{} strips fell outside the {}x{} surface and were clipped",
                self.surface.clipped_strips(),
                self.surface.max_width(),
                self.surface.max_height()
            );
        }
        log::debug!(
            "Decoded {} opcodes from {} bytes: {} ({}x{})",
            self.opcodes,
            position,
            halt,
            width,
            height
        );

        Decoded {
            surface: self.surface,
            width,
            height,
            state: self.state,
            halt,
            bytes_consumed: position,
            opcodes: self.opcodes,
            trace: self.sink.into_events(),
        }
    }

    fn halt(&mut self, halt: Halt) -> Step {
        self.phase = Phase::Halted(halt);
        Step::Halted(halt)
    }

    fn trace(&mut self, position: usize, message: impl FnOnce() -> String) {
        if self.sink.enabled() {
            self.sink.record(TraceEvent::new(position, message()));
        }
    }

    fn read_opcode(&mut self) -> Option<(usize, u8)> {
        let position = self.cursor.position();
        self.cursor.next().map(|byte| (position, byte))
    }

    /// Read an operand byte; running out of data ends the job.
    fn operand(&mut self) -> Result<u8, Stop> {
        self.cursor.next().ok_or(Stop::Halt(Halt::Truncated {
            opcode_position: self.opcode_position,
        }))
    }

    fn operand_u16(&mut self) -> Result<u16, Stop> {
        self.cursor.next_u16_le().ok_or(Stop::Halt(Halt::Truncated {
            opcode_position: self.opcode_position,
        }))
    }

    // ========================================================================
    // PREAMBLE
    // ========================================================================

    fn skip_preamble(&mut self) {
        let mut skipped = 0usize;
        loop {
            let Some((position, byte)) = self.read_opcode() else {
                self.lookahead = None;
                break;
            };
            if byte == ESC {
                self.lookahead = Some((position, byte));
                break;
            }
            self.trace(position, || {
                format!("skipping until ESC ({}, {}{})", skipped, byte, printable_suffix(byte))
            });
            skipped += 1;
        }

        if skipped > 0 {
            log::debug!("Skipped {} preamble bytes", skipped);
        }
    }

    // ========================================================================
    // DISPATCH
    // ========================================================================

    fn dispatch(&mut self, byte: u8) -> Result<(), Stop> {
        let position = self.opcode_position;
        match Opcode::from_byte(byte) {
            Opcode::Escape => self.escape(),

            Opcode::RasterLine => {
                let len = self.operand_u16()? as usize;
                self.raster_line('G', len)
            }

            Opcode::RasterLineShort => {
                let _ignored = self.operand()?;
                let len = self.operand()? as usize;
                self.raster_line('g', len)
            }

            Opcode::Compression => {
                let mode = self.operand()?;
                if mode == COMPRESSION_RLE {
                    self.state.enable_compression();
                }
                let on = self.state.compression();
                self.trace(position, || {
                    format!("M compression type {} (compression {})", mode, on_off(on))
                });
                Ok(())
            }

            Opcode::BlankLine => {
                let x = self.state.xpos();
                let strips = self.config.blank_line_strips;
                for i in 0..strips {
                    self.paint(x, i * STRIP_HEIGHT, 0x00);
                }
                for i in 0..BLANK_LINE_FILLER_STRIPS {
                    self.paint_filler(x + 1, i * STRIP_HEIGHT, RASTER_FILLER);
                }
                self.state.advance_column();
                self.trace(position, || format!("Z blank raster line xpos={}", x));
                Ok(())
            }

            Opcode::PrintFeed(code) => {
                self.trace(position, || format!("form feed ({})", code));
                Ok(())
            }

            Opcode::FormFeed => {
                self.state.form_feed(self.config.form_feed_dots);
                self.trace(position, || "FF form feed".to_string());
                Ok(())
            }

            Opcode::CarriageReturn => {
                self.state.carriage_return();
                self.trace(position, || "CR".to_string());
                Ok(())
            }

            Opcode::LineFeed => {
                self.state.advance_y(self.config.line_feed_dots);
                self.trace(position, || "LF".to_string());
                Ok(())
            }

            Opcode::Null => {
                self.trace(position, || "NUL terminator".to_string());
                Err(Stop::Halt(Halt::NullTerminator { position }))
            }

            Opcode::Unknown(byte) => Err(Stop::Error(DecodeError {
                position,
                byte: Some(byte),
                kind: DecodeErrorKind::UnrecognizedOpcode,
            })),
        }
    }

    fn escape(&mut self) -> Result<(), Stop> {
        let position = self.cursor.position();
        let byte = self.operand()?;

        match EscCommand::from_byte(byte) {
            EscCommand::Initialize => {
                self.trace(position, || "ESC @ initialize".to_string());
                Ok(())
            }

            EscCommand::RelativeX => {
                let dots = self.operand_u16()?;
                let x = self.state.xpos().saturating_add(dots as usize);
                self.state.set_xpos(x);
                self.trace(position, || format!("ESC \\ set relative position +{}", dots));
                Ok(())
            }

            EscCommand::Info => self.info(),

            EscCommand::BitImage => self.bit_image(position),

            EscCommand::Unknown(byte) => Err(Stop::Error(DecodeError {
                position,
                byte: Some(byte),
                kind: DecodeErrorKind::UnrecognizedEscapeSequence,
            })),
        }
    }

    /// `ESC i` device settings. Unknown sub-commands are traced and skipped.
    fn info(&mut self) -> Result<(), Stop> {
        let position = self.cursor.position();
        let code = self.operand()?;
        let command = InfoCommand::from_byte(code);

        match command {
            InfoCommand::ContinuousPage => self.state.continuous_page(),
            InfoCommand::Unknown(code) => {
                self.trace(position, || format!("unrecognized ESC i code {}", code));
                return Ok(());
            }
            _ => {}
        }
        self.trace(position, || command.describe().to_string());

        for i in 0..command.operand_len() {
            let at = self.cursor.position();
            let value = self.operand()?;
            self.trace(at, || format!("operand {}: {}", i, value));
        }
        Ok(())
    }

    /// `ESC * m nL nH` followed by three bytes per column.
    fn bit_image(&mut self, position: usize) -> Result<(), Stop> {
        self.trace(position, || "ESC * graphics command".to_string());

        let mode_position = self.cursor.position();
        let mode = self.operand()?;
        if mode != BIT_IMAGE_MODE_24 && !self.options.accept_any_graphics_mode {
            return Err(Stop::Error(DecodeError {
                position: mode_position,
                byte: Some(mode),
                kind: DecodeErrorKind::UnsupportedGraphicsMode,
            }));
        }

        let columns = self.operand_u16()?;
        self.trace(mode_position, || {
            format!(
                "ESC * graphics mode={} columns={} (expect {} bytes)",
                mode,
                columns,
                columns as usize * 3
            )
        });

        for _ in 0..columns {
            let x = self.state.xpos();
            let y = self.state.ypos();
            for band in 0..3 {
                let byte = self.operand()?;
                self.paint(x, y + band * STRIP_HEIGHT, byte);
            }
            for band in 0..3 {
                self.paint_filler(x + 1, y + band * STRIP_HEIGHT, BIT_IMAGE_FILLER);
            }
            self.paint_filler(x, y + 3 * STRIP_HEIGHT, BIT_IMAGE_FILLER);
            self.state.advance_column();
        }
        Ok(())
    }

    /// Shared body of `G` and `g`: one column of strips from the top row down.
    fn raster_line(&mut self, name: char, len: usize) -> Result<(), Stop> {
        let position = self.opcode_position;
        let x = self.state.xpos();
        let compressed = self.state.compression();

        let mut line = std::mem::take(&mut self.state.expansion);
        let complete = if compressed {
            rle::expand_into(&mut self.cursor, len, &mut line).complete
        } else {
            line.clear();
            while line.len() < len {
                match self.cursor.next() {
                    Some(byte) => line.push(byte),
                    None => break,
                }
            }
            line.len() == len
        };

        for (i, &byte) in line.iter().enumerate() {
            self.paint(x, i * STRIP_HEIGHT, byte);
        }
        for i in 0..line.len() {
            self.paint_filler(x + 1, i * STRIP_HEIGHT, RASTER_FILLER);
        }
        let painted = line.len();
        self.state.expansion = line;
        self.state.advance_column();

        self.trace(position, || {
            format!(
                "{} raster line xpos={} numchars={} compression={} strips={}",
                name,
                x,
                len,
                on_off(compressed),
                painted
            )
        });

        if !complete {
            return Err(Stop::Halt(Halt::Truncated {
                opcode_position: position,
            }));
        }
        Ok(())
    }

    // ========================================================================
    // PAINTING
    // ========================================================================

    fn paint(&mut self, x: usize, y: usize, byte: u8) {
        self.surface.paint_strip(x, y, byte);
        self.state.note_strip(y);
    }

    fn paint_filler(&mut self, x: usize, y: usize, byte: u8) {
        if self.options.draw_filler {
            self.paint(x, y, byte);
        }
    }
}

fn printable_suffix(byte: u8) -> String {
    if (32..=126).contains(&byte) {
        format!(", '{}'", byte as char)
    } else {
        String::new()
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}
