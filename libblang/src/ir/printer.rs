// Copyright 2025-2026 Neil Henderson
//
//! The `printer` module serialises a compiled [Program] into the textual IR report.
//!
//! The report has four sections: functions, external symbols, global variables, and (when the
//! data segment is not empty) a hex-and-ASCII dump of the data section.

use std::fmt::Write;

use super::{Arg, Func, Global, Op, Program};

/// Number of data-segment bytes printed per dump row.
const DATA_ROW_SIZE: usize = 12;

/// Serialises the program into the textual IR report.
pub fn print_program(program: &Program) -> String {
    let mut out = String::new();

    print_funcs(&mut out, &program.funcs);
    print_extrns(&mut out, &program.extrns);
    print_globals(&mut out, &program.globals);
    print_data_section(&mut out, &program.data);

    out
}

fn print_funcs(out: &mut String, funcs: &[Func]) {
    out.push_str("-- Functions --\n\n");
    for func in funcs {
        print_function(out, func);
    }
}

fn print_function(out: &mut String, func: &Func) {
    _ = writeln!(out, "{}({}, {}):", func.name, func.params_count, func.auto_vars_count);

    for (addr, op) in func.body.iter().enumerate() {
        _ = write!(out, "{addr:8}:");
        print_opcode(out, &op.opcode);
    }
}

fn print_opcode(out: &mut String, opcode: &Op) {
    match opcode {
        Op::Bogus => {
            out.push_str("    <bogus>\n");
        }
        Op::UnaryNot { result, arg } => {
            _ = writeln!(out, "    auto[{result}] = !{arg}");
        }
        Op::Negate { result, arg } => {
            _ = writeln!(out, "    auto[{result}] = -{arg}");
        }
        Op::Asm { args } => {
            out.push_str("    __asm__(\n");
            for line in args {
                _ = writeln!(out, "        {line}");
            }
            out.push_str("    )\n");
        }
        Op::Binop { binop, index, lhs, rhs } => {
            _ = writeln!(out, "    auto[{index}] = {lhs} {binop} {rhs}");
        }
        Op::AutoAssign { index, arg } => {
            _ = writeln!(out, "    auto[{index}] = {arg}");
        }
        Op::ExternalAssign { name, arg } => {
            _ = writeln!(out, "    {name} = {arg}");
        }
        Op::Store { index, arg } => {
            _ = writeln!(out, "    store deref[{index}], {arg}");
        }
        Op::Funcall { result, fun, args } => {
            _ = write!(out, "    auto[{result}] = ");
            print_callee(out, fun);
            for arg in args {
                _ = write!(out, ", {arg}");
            }
            out.push_str(")\n");
        }
        Op::Label { label } => {
            _ = writeln!(out, "    label[{label}]");
        }
        Op::JmpLabel { label } => {
            _ = writeln!(out, "    jmp label[{label}]");
        }
        Op::JmpIfNotLabel { label, arg } => {
            _ = writeln!(out, "    jmp_if_not label[{label}], {arg}");
        }
        Op::Return { arg } => {
            out.push_str("    return");
            if let Some(arg) = arg {
                _ = write!(out, " {arg}");
            }
            out.push('\n');
        }
    }
}

fn print_callee(out: &mut String, fun: &Arg) {
    match fun {
        Arg::External(name) | Arg::RefExternal(name) => {
            _ = write!(out, "call(\"{name}\"");
        }
        _ => {
            _ = write!(out, "call({fun}");
        }
    }
}

fn print_extrns(out: &mut String, extrns: &[String]) {
    out.push_str("\n-- External Symbols --\n\n");
    for name in extrns {
        _ = writeln!(out, "    {name}");
    }
}

fn print_globals(out: &mut String, globals: &[Global]) {
    out.push_str("\n-- Global Variables --\n\n");
    for global in globals {
        _ = write!(out, "{}", global.name);
        if global.is_vector {
            _ = write!(out, "[{}]", global.minimum_size);
        }
        out.push_str(": ");
        for (i, value) in global.values.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            _ = write!(out, "{value}");
        }
        out.push('\n');
    }
}

fn print_data_section(out: &mut String, data: &[u8]) {
    if data.is_empty() {
        return;
    }

    out.push_str("\n-- Data Section --\n\n");

    for row_start in (0..data.len()).step_by(DATA_ROW_SIZE) {
        _ = write!(out, "{row_start:04X}:");

        for offset in row_start..row_start + DATA_ROW_SIZE {
            match data.get(offset) {
                Some(byte) => _ = write!(out, " {byte:02X}"),
                None => out.push_str("   "),
            }
        }

        out.push_str(" | ");

        for byte in &data[row_start..data.len().min(row_start + DATA_ROW_SIZE)] {
            if byte.is_ascii_graphic() || *byte == b' ' {
                out.push(*byte as char);
            } else {
                out.push('.');
            }
        }

        out.push('\n');
    }
}
