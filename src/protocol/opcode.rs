//! # Opcode Tables
//!
//! Every command byte is classified once into a closed enumeration, so the
//! decoder matches on variants instead of comparing raw bytes.
//!
//! ## Top Level
//!
//! | Byte | Variant |
//! |------|---------|
//! | 0x1B | [`Opcode::Escape`] |
//! | `G`  | [`Opcode::RasterLine`] |
//! | `g`  | [`Opcode::RasterLineShort`] |
//! | `M`  | [`Opcode::Compression`] |
//! | `Z`  | [`Opcode::BlankLine`] |
//! | 0x1A, 0x03 | [`Opcode::PrintFeed`] |
//! | 0x0C | [`Opcode::FormFeed`] |
//! | 0x0D | [`Opcode::CarriageReturn`] |
//! | 0x0A | [`Opcode::LineFeed`] |
//! | 0x00 | [`Opcode::Null`] |
//!
//! ## After ESC
//!
//! `@`, `\`, `i`, `*` - see [`EscCommand`]. After `ESC i` - see [`InfoCommand`].

use super::commands::{CR, ESC, ETX, FF, LF, SUB};

/// Top-level command byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Escape,
    /// `G nL nH` raster line with 16-bit length
    RasterLine,
    /// `g n1 n2` raster line, only `n2` carries the length
    RasterLineShort,
    /// `M n` compression select
    Compression,
    /// `Z` blank raster line
    BlankLine,
    /// Control-Z or ETX: page end without position change
    PrintFeed(u8),
    FormFeed,
    CarriageReturn,
    LineFeed,
    /// 0x00 terminates decoding
    Null,
    Unknown(u8),
}

impl Opcode {
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            ESC => Opcode::Escape,
            b'G' => Opcode::RasterLine,
            b'g' => Opcode::RasterLineShort,
            b'M' => Opcode::Compression,
            b'Z' => Opcode::BlankLine,
            SUB | ETX => Opcode::PrintFeed(byte),
            FF => Opcode::FormFeed,
            CR => Opcode::CarriageReturn,
            LF => Opcode::LineFeed,
            0x00 => Opcode::Null,
            other => Opcode::Unknown(other),
        }
    }
}

/// Command byte following ESC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscCommand {
    /// `ESC @`
    Initialize,
    /// `ESC \ nL nH`
    RelativeX,
    /// `ESC i c ...`
    Info,
    /// `ESC * m nL nH`
    BitImage,
    Unknown(u8),
}

impl EscCommand {
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            b'@' => EscCommand::Initialize,
            b'\\' => EscCommand::RelativeX,
            b'i' => EscCommand::Info,
            b'*' => EscCommand::BitImage,
            other => EscCommand::Unknown(other),
        }
    }
}

/// Sub-command byte following `ESC i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoCommand {
    /// `ESC i M n` various mode settings
    VariousMode,
    /// `ESC i D n`
    SettingD,
    /// `ESC i R n` switch to raster mode
    RasterMode,
    /// `ESC i K n` expanded mode
    ExpandedMode,
    /// `ESC i a n` switch between ESC/P and raster command mode
    CommandMode,
    /// `ESC i A n` auto-cut (PT-9700)
    AutoCut,
    /// `ESC i B n d1..d49` baud rate change
    BaudRate,
    /// `ESC i c` + 5 operands
    PrintInformation,
    /// `ESC i d nL nH` margin amount
    MarginAmount,
    /// `ESC i z` + 10 operands (QL-500 media information)
    ModelInformation,
    /// `ESC i P` continuous page
    ContinuousPage,
    /// `ESC i S` status request
    StatusRequest,
    Unknown(u8),
}

impl InfoCommand {
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            b'M' => InfoCommand::VariousMode,
            b'D' => InfoCommand::SettingD,
            b'R' => InfoCommand::RasterMode,
            b'K' => InfoCommand::ExpandedMode,
            b'a' => InfoCommand::CommandMode,
            b'A' => InfoCommand::AutoCut,
            b'B' => InfoCommand::BaudRate,
            b'c' => InfoCommand::PrintInformation,
            b'd' => InfoCommand::MarginAmount,
            b'z' => InfoCommand::ModelInformation,
            b'P' => InfoCommand::ContinuousPage,
            b'S' => InfoCommand::StatusRequest,
            other => InfoCommand::Unknown(other),
        }
    }

    /// Number of operand bytes that follow the sub-command byte.
    pub fn operand_len(self) -> usize {
        match self {
            InfoCommand::VariousMode
            | InfoCommand::SettingD
            | InfoCommand::RasterMode
            | InfoCommand::ExpandedMode
            | InfoCommand::CommandMode
            | InfoCommand::AutoCut => 1,
            InfoCommand::BaudRate => 1 + 49,
            InfoCommand::PrintInformation => 5,
            InfoCommand::MarginAmount => 2,
            InfoCommand::ModelInformation => 10,
            InfoCommand::ContinuousPage
            | InfoCommand::StatusRequest
            | InfoCommand::Unknown(_) => 0,
        }
    }

    /// Human-readable name used in decode traces.
    pub fn describe(self) -> &'static str {
        match self {
            InfoCommand::VariousMode => "ESC i M various mode",
            InfoCommand::SettingD => "ESC i D",
            InfoCommand::RasterMode => "ESC i R raster mode",
            InfoCommand::ExpandedMode => "ESC i K set expanded mode",
            InfoCommand::CommandMode => "ESC i a switch between ESC/P and raster mode",
            InfoCommand::AutoCut => "ESC i A auto-cut enable (PT-9700)",
            InfoCommand::BaudRate => "ESC i B baud rate change",
            InfoCommand::PrintInformation => "ESC i c print information",
            InfoCommand::MarginAmount => "ESC i d set margin amount",
            InfoCommand::ModelInformation => "ESC i z model information (QL-500)",
            InfoCommand::ContinuousPage => "ESC i P continuous page",
            InfoCommand::StatusRequest => "ESC i S status request",
            InfoCommand::Unknown(_) => "ESC i unrecognized",
        }
    }
}
