// Copyright 2025-2026 Neil Henderson
//
//! The `ir` module defines the three-address intermediate representation that the compiler emits
//! while parsing, and the [printer] that serialises it into the textual IR report.

pub mod printer;


use std::fmt;

use crate::codegen::Target;
use crate::lexer::SourceLocation;

/// A value operand of an instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    /// An error sentinel. Produced after a recoverable compile error so that parsing can
    /// continue; it silently absorbs any further operation applied to it.
    Bogus,

    /// The value of a function-local stack slot. Indices are dense and 1-based.
    AutoVar(usize),

    /// The word in memory addressed by the value of a stack slot.
    Deref(usize),

    /// The address of a stack slot.
    RefAutoVar(usize),

    /// The address of an external symbol.
    RefExternal(String),

    /// The value of an external symbol (a global variable or function).
    External(String),

    /// An integer constant.
    Literal(u64),

    /// The address of a byte in the data segment.
    DataOffset(usize),
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Bogus => write!(f, "<bogus>"),
            Arg::AutoVar(index) => write!(f, "auto[{index}]"),
            Arg::Deref(index) => write!(f, "deref[{index}]"),
            Arg::RefAutoVar(index) => write!(f, "ref auto[{index}]"),
            Arg::RefExternal(name) => write!(f, "ref {name}"),
            Arg::External(name) => write!(f, "{name}"),
            Arg::Literal(value) => write!(f, "{value}"),
            Arg::DataOffset(offset) => write!(f, "data[{offset}]"),
        }
    }
}

/// Binary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Binop {
    Plus,
    Minus,
    Mult,
    Mod,
    Div,
    Less,
    Greater,
    Equal,
    NotEqual,
    GreaterEqual,
    LessEqual,
    BitOr,
    BitAnd,
    BitShl,
    BitShr,
}

impl fmt::Display for Binop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Binop::Plus => "+",
            Binop::Minus => "-",
            Binop::Mult => "*",
            Binop::Mod => "%",
            Binop::Div => "/",
            Binop::Less => "<",
            Binop::Greater => ">",
            Binop::Equal => "==",
            Binop::NotEqual => "!=",
            Binop::GreaterEqual => ">=",
            Binop::LessEqual => "<=",
            Binop::BitOr => "|",
            Binop::BitAnd => "&",
            Binop::BitShl => "<<",
            Binop::BitShr => ">>",
        };
        write!(f, "{text}")
    }
}

/// A three-address instruction.
///
/// Destinations are either a stack-slot index, an external symbol name, or (for [Op::Store]) the
/// memory addressed by a stack slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    /// A placeholder. Emitted for a forward `goto` and patched to [Op::JmpLabel] when the
    /// function is finalised; one that survives indicates a reported compile error.
    Bogus,

    /// `auto[result] = !arg`
    UnaryNot { result: usize, arg: Arg },

    /// `auto[result] = -arg`
    Negate { result: usize, arg: Arg },

    /// Verbatim assembly lines for the target. There is no surface syntax that produces this yet.
    Asm { args: Vec<String> },

    /// `auto[index] = lhs binop rhs`
    Binop { binop: Binop, index: usize, lhs: Arg, rhs: Arg },

    /// `auto[index] = arg`
    AutoAssign { index: usize, arg: Arg },

    /// `name = arg`
    ExternalAssign { name: String, arg: Arg },

    /// `*auto[index] = arg`
    Store { index: usize, arg: Arg },

    /// `auto[result] = fun(args...)`. Arguments are fully evaluated, left to right, before the
    /// call.
    Funcall { result: usize, fun: Arg, args: Vec<Arg> },

    /// A jump target. Label ids are function-local.
    Label { label: usize },

    /// An unconditional jump.
    JmpLabel { label: usize },

    /// A jump taken when `arg` is zero.
    JmpIfNotLabel { label: usize, arg: Arg },

    /// Return from the function, with an optional value.
    Return { arg: Option<Arg> },
}

/// An instruction paired with the source location it was emitted for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpWithLocation {
    pub opcode: Op,
    pub location: SourceLocation,
}

/// A compiled function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Func {
    pub name: String,
    pub name_location: SourceLocation,
    pub body: Vec<OpWithLocation>,
    pub params_count: usize,

    /// The high-water mark of concurrently live stack slots; every `auto[i]` in the body
    /// satisfies `1 <= i <= auto_vars_count`.
    pub auto_vars_count: usize,
}

/// An initialiser value of a global variable definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImmediateValue {
    Name(String),
    Literal(u64),
    DataOffset(usize),
}

impl fmt::Display for ImmediateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImmediateValue::Name(name) => write!(f, "{name}"),
            ImmediateValue::Literal(value) => write!(f, "{value}"),
            ImmediateValue::DataOffset(offset) => write!(f, "data[{offset}]"),
        }
    }
}

/// A compiled global variable definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Global {
    pub name: String,
    pub values: Vec<ImmediateValue>,

    /// Was the global declared with `[size?]` vector brackets?
    pub is_vector: bool,

    /// The declared minimum vector size (0 when not given).
    pub minimum_size: usize,
}

/// A compiled program: the output of the compiler and the input of a code generator.
#[derive(Debug)]
pub struct Program {
    pub funcs: Vec<Func>,
    pub globals: Vec<Global>,

    /// Symbols declared `extrn` anywhere in the program, deduplicated, in first-use order.
    pub extrns: Vec<String>,

    /// The data segment. Strings are appended NUL-terminated and referenced by byte offset.
    pub data: Vec<u8>,

    pub target: Target,
}
