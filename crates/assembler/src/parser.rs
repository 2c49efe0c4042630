//! Parser for opsem assembly tokens → instructions.
//!
//! Dispatches on the opcode's operand shape. Constants are written as
//! literals: `7`, `0x7f`, `3L`, `3.0f`, `2.5d`, `2.5`, `NaNf`,
//! `-Infinityd`, `"text"`, `class Name`, `null`.

use crate::error::AsmError;
use crate::lexer::Token;
use opsem_common::instruction::{parse_field_descriptor, parse_method_descriptor};
use opsem_common::{
    ElementKind, FieldRef, Instruction, Kind, MethodRef, Opcode, Operand, OperandShape,
    Reference, Value,
};

/// Parse the tokens of a single line into an instruction.
///
/// Returns `Ok(None)` for blank lines (empty token list).
pub(crate) fn parse_line(
    tokens: &[Token],
    line_num: usize,
) -> Result<Option<Instruction>, AsmError> {
    let Some(first) = tokens.first() else {
        return Ok(None);
    };

    let mnemonic = match first {
        Token::Word(w) => w.as_str(),
        Token::Str(_) => {
            return Err(AsmError::UnexpectedToken {
                line: line_num,
                token: first.text(),
            })
        }
    };

    let opcode: Opcode = mnemonic.parse().map_err(|_| AsmError::UnknownOpcode {
        line: line_num,
        token: mnemonic.to_string(),
    })?;

    let args = &tokens[1..];
    let op = opcode.mnemonic();

    let operand = match opcode.operand_shape() {
        OperandShape::None => {
            expect_end(args, line_num)?;
            Operand::None
        }

        OperandShape::Local => {
            let index = expect_u16(args, 0, line_num, op, 1)?;
            expect_end(&args[1..], line_num)?;
            Operand::Local(index)
        }

        OperandShape::Byte => {
            let value = expect_int::<i8>(args, 0, line_num, op, 1)?;
            expect_end(&args[1..], line_num)?;
            Operand::Immediate(i32::from(value))
        }

        OperandShape::Short => {
            let value = expect_int::<i16>(args, 0, line_num, op, 1)?;
            expect_end(&args[1..], line_num)?;
            Operand::Immediate(i32::from(value))
        }

        OperandShape::Constant | OperandShape::WideConstant => {
            if args.is_empty() {
                return Err(AsmError::MissingArgument {
                    line: line_num,
                    opcode: op,
                    expected: 1,
                });
            }
            let (value, used) = parse_constant(args, line_num)?;
            expect_end(&args[used..], line_num)?;
            let wide = opcode.operand_shape() == OperandShape::WideConstant;
            if matches!(value.kind(), Kind::Long | Kind::Double) != wide {
                return Err(AsmError::InvalidLiteral {
                    line: line_num,
                    token: args[0].text(),
                });
            }
            Operand::Constant(value)
        }

        OperandShape::Increment => {
            let index = expect_u16(args, 0, line_num, op, 2)?;
            let delta = expect_int::<i16>(args, 1, line_num, op, 2)?;
            expect_end(&args[2..], line_num)?;
            Operand::Increment { index, delta }
        }

        OperandShape::Branch => {
            let offset = expect_int::<i16>(args, 0, line_num, op, 1)?;
            expect_end(&args[1..], line_num)?;
            Operand::Branch(offset)
        }

        OperandShape::ElementKind => {
            let word = expect_word(args, 0, line_num, op, 1)?;
            let kind = parse_element_kind(word).ok_or_else(|| AsmError::InvalidElementKind {
                line: line_num,
                token: word.to_string(),
            })?;
            expect_end(&args[1..], line_num)?;
            Operand::ElementKind(kind)
        }

        OperandShape::Field => {
            let name = expect_word(args, 0, line_num, op, 2)?;
            let desc = expect_word(args, 1, line_num, op, 2)?;
            let kind = parse_field_descriptor(desc).ok_or_else(|| AsmError::InvalidDescriptor {
                line: line_num,
                token: desc.to_string(),
            })?;
            expect_end(&args[2..], line_num)?;
            Operand::Field(FieldRef::new(name, kind))
        }

        OperandShape::Method => {
            let name = expect_word(args, 0, line_num, op, 2)?;
            let desc = expect_word(args, 1, line_num, op, 2)?;
            let (params, returns) =
                parse_method_descriptor(desc).ok_or_else(|| AsmError::InvalidDescriptor {
                    line: line_num,
                    token: desc.to_string(),
                })?;
            expect_end(&args[2..], line_num)?;
            Operand::Method(MethodRef::new(name, params, returns))
        }
    };

    Ok(Some(Instruction::new(opcode, operand)))
}

/// Parse a constant from the front of `args`, returning the value and the
/// number of tokens it took. `args` must not be empty.
pub(crate) fn parse_constant(args: &[Token], line: usize) -> Result<(Value, usize), AsmError> {
    match &args[0] {
        Token::Str(s) => Ok((Reference::string(s.as_str()).into(), 1)),
        Token::Word(w) if w == "null" => Ok((Value::null(), 1)),
        Token::Word(w) if w == "class" => match args.get(1) {
            Some(Token::Word(name)) => Ok((Reference::class(name.as_str()).into(), 2)),
            Some(other) => Err(AsmError::UnexpectedToken {
                line,
                token: other.text(),
            }),
            None => Err(AsmError::MissingArgument {
                line,
                opcode: "class",
                expected: 1,
            }),
        },
        Token::Word(w) => parse_number(w, line),
    }
}

/// Parse a numeric literal. Suffix picks the kind: `L` long, `f` float,
/// `d` double; unsuffixed literals are ints unless they have a fraction,
/// an exponent or are `NaN`/`Infinity`, which makes them doubles.
fn parse_number(word: &str, line: usize) -> Result<(Value, usize), AsmError> {
    let numeric_start = word
        .trim_start_matches(['-', '+'])
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || c == '.' || c == 'N' || c == 'I');
    if !numeric_start {
        return Err(AsmError::InvalidLiteral {
            line,
            token: word.to_string(),
        });
    }

    let invalid = || AsmError::InvalidNumber {
        line,
        token: word.to_string(),
    };

    let (negative, unsigned) = match word.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, word.strip_prefix('+').unwrap_or(word)),
    };

    if let Some(hex) = unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))
    {
        let (digits, long) = match hex.strip_suffix(['L', 'l']) {
            Some(d) => (d, true),
            None => (hex, false),
        };
        let bits = u64::from_str_radix(digits, 16).map_err(|_| invalid())?;
        let value = if long {
            let v = bits as i64;
            Value::Int64(if negative { v.wrapping_neg() } else { v })
        } else {
            let bits = u32::try_from(bits).map_err(|_| invalid())?;
            let v = bits as i32;
            Value::Int32(if negative { v.wrapping_neg() } else { v })
        };
        return Ok((value, 1));
    }

    let value = if let Some(body) = word.strip_suffix(['L', 'l']) {
        Value::Int64(body.parse().map_err(|_| invalid())?)
    } else if let Some(body) = word.strip_suffix(['f', 'F']) {
        Value::Float32(parse_float(body).ok_or_else(invalid)?)
    } else if let Some(body) = word.strip_suffix(['d', 'D']) {
        Value::Float64(parse_float(body).ok_or_else(invalid)?)
    } else if unsigned.contains(['.', 'e', 'E']) || unsigned == "NaN" || unsigned == "Infinity" {
        Value::Float64(parse_float(word).ok_or_else(invalid)?)
    } else {
        Value::Int32(word.parse().map_err(|_| invalid())?)
    };
    Ok((value, 1))
}

/// Parse float text, spelling the specials `NaN`, `Infinity`, `-Infinity`.
/// Parsing straight into the target width rounds `3.1f` only once.
fn parse_float<T: std::str::FromStr>(body: &str) -> Option<T> {
    let text = match body {
        "NaN" => "NaN",
        "Infinity" | "+Infinity" => "inf",
        "-Infinity" => "-inf",
        _ if body.chars().all(|c| c.is_ascii_digit() || "+-.eE".contains(c)) => body,
        _ => return None,
    };
    text.parse().ok()
}

fn parse_element_kind(word: &str) -> Option<ElementKind> {
    if let Ok(kind) = word.parse::<ElementKind>() {
        return Some(kind);
    }
    word.parse::<u8>()
        .ok()
        .and_then(|code| ElementKind::try_from(code).ok())
}

/// Extract the word at position `idx`.
fn expect_word<'a>(
    args: &'a [Token],
    idx: usize,
    line: usize,
    opcode: &'static str,
    expected: usize,
) -> Result<&'a str, AsmError> {
    match args.get(idx) {
        Some(Token::Word(w)) => Ok(w),
        Some(other) => Err(AsmError::UnexpectedToken {
            line,
            token: other.text(),
        }),
        None => Err(AsmError::MissingArgument {
            line,
            opcode,
            expected,
        }),
    }
}

/// Extract a signed integer of type `T` from the word at `idx`, accepting
/// an optional `+` or `-`.
fn expect_int<T: std::str::FromStr>(
    args: &[Token],
    idx: usize,
    line: usize,
    opcode: &'static str,
    expected: usize,
) -> Result<T, AsmError> {
    let word = expect_word(args, idx, line, opcode, expected)?;
    word.parse().map_err(|_| AsmError::InvalidNumber {
        line,
        token: word.to_string(),
    })
}

fn expect_u16(
    args: &[Token],
    idx: usize,
    line: usize,
    opcode: &'static str,
    expected: usize,
) -> Result<u16, AsmError> {
    expect_int::<u16>(args, idx, line, opcode, expected)
}

/// Check that there are no extra tokens.
fn expect_end(remaining: &[Token], line: usize) -> Result<(), AsmError> {
    match remaining.first() {
        Some(tok) => Err(AsmError::UnexpectedToken {
            line,
            token: tok.text(),
        }),
        None => Ok(()),
    }
}
