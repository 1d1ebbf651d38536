//! # Type Parser
//!
//! Turns bracketed type syntax into [`Type`] values:
//!
//! ```text
//! e, t, s, n          atomic types (any lowercase letter)
//! 'a                  type variable
//! <e,t>               composite type
//! et                  juxtaposition of two simple types, same as <e,t>
//! e*e, e×e*n          product of simple types
//! <e*e,<e,t>>         nesting
//! ```
//!
//! The parser is a small stack machine: one frame per open `<`, each tracking
//! the `(left, right)` pair under construction, whether the comma has been read,
//! and whether a `*` is waiting for its next member. Every malformed transition
//! reports what went wrong and where, since the messages are shown to students.
//!
//! The stop-early mode lets the expression parser read an inline annotation such
//! as `x_<e,t>(a)`: the machine stops at the first character that cannot extend
//! a complete type and reports where it stopped.

use crate::parser::ParseError;

use super::ty::Type;

/// Parse a complete type.
pub fn parse_type(text: &str) -> Result<Type, ParseError> {
    let chars: Vec<char> = text.chars().collect();
    let (ty, _) = run(&chars, 0, false)?;
    Ok(ty)
}

/// Parse the longest type starting at `start`, returning it with the position
/// of the first character after it.
pub fn parse_type_prefix(chars: &[char], start: usize) -> Result<(Type, usize), ParseError> {
    run(chars, start, true)
}

#[derive(Debug, Default)]
struct Frame {
    /// Position of the opening `<`; `None` for the outermost level.
    opened_at: Option<usize>,
    left: Option<Type>,
    right: Option<Type>,
    comma: bool,
    /// Position of a `*` still waiting for its right-hand member.
    pending_star: Option<usize>,
    /// The slot holds a single simple type that the next simple type may be
    /// juxtaposed with.
    juxtaposable: bool,
}

impl Frame {
    fn slot(&mut self) -> &mut Option<Type> {
        if self.comma {
            &mut self.right
        } else {
            &mut self.left
        }
    }

    fn slot_ref(&self) -> &Option<Type> {
        if self.comma { &self.right } else { &self.left }
    }
}

enum Step {
    Continue,
    Stop,
}

struct TypeMachine {
    stack: Vec<Frame>,
    stop_early: bool,
}

fn run(chars: &[char], start: usize, stop_early: bool) -> Result<(Type, usize), ParseError> {
    let mut machine = TypeMachine {
        stack: vec![Frame::default()],
        stop_early,
    };
    let mut pos = start;
    while pos < chars.len() {
        match machine.step(chars, pos)? {
            (Step::Continue, next) => pos = next,
            (Step::Stop, _) => break,
        }
    }
    let ty = machine.finish(pos)?;
    Ok((ty, pos))
}

impl TypeMachine {
    fn top(&mut self) -> &mut Frame {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    fn at_outer_level(&self) -> bool {
        self.stack.len() == 1
    }

    /// Whether the outermost frame holds a finished type.
    fn complete(&self) -> bool {
        self.at_outer_level()
            && self.stack[0].left.is_some()
            && self.stack[0].pending_star.is_none()
    }

    fn step(&mut self, chars: &[char], pos: usize) -> Result<(Step, usize), ParseError> {
        let c = chars[pos];

        if self.stop_early && self.complete() && !self.extends_complete_type(chars, pos) {
            return Ok((Step::Stop, pos));
        }

        match c {
            ' ' | '\t' | '\n' | '\r' => Ok((Step::Continue, pos + 1)),
            '<' => {
                self.open_bracket(pos)?;
                Ok((Step::Continue, pos + 1))
            }
            ',' => {
                self.comma(pos)?;
                Ok((Step::Continue, pos + 1))
            }
            '>' => {
                self.close_bracket(pos)?;
                Ok((Step::Continue, pos + 1))
            }
            '*' | '×' => {
                self.star(pos)?;
                Ok((Step::Continue, pos + 1))
            }
            '\'' => match chars.get(pos + 1) {
                Some(&v) if v.is_ascii_alphabetic() => {
                    self.simple(Type::var(v), pos)?;
                    Ok((Step::Continue, pos + 2))
                }
                _ => Err(ParseError::syntax(
                    "a type variable is written as ' followed by a letter, as in 'a",
                    pos,
                )),
            },
            c if c.is_ascii_lowercase() => {
                self.simple(Type::Atomic(c), pos)?;
                Ok((Step::Continue, pos + 1))
            }
            c if c.is_ascii_uppercase() => Err(ParseError::bad_character(
                c,
                "atomic types are written with lowercase letters",
                pos,
            )),
            c => Err(ParseError::bad_character(
                c,
                "only letters, ', <, >, commas and * may appear in a type",
                pos,
            )),
        }
    }

    /// In stop-early mode, whether the character at `pos` continues the
    /// finished outermost type.
    fn extends_complete_type(&self, chars: &[char], pos: usize) -> bool {
        let frame = &self.stack[0];
        let simple_slot = matches!(frame.left, Some(Type::Atomic(_) | Type::Var(_)));
        let product_slot = matches!(frame.left, Some(Type::Product(_)));
        match chars[pos] {
            '*' | '×' => {
                (simple_slot || product_slot)
                    && chars
                        .get(pos + 1)
                        .is_some_and(|c| c.is_ascii_lowercase() || *c == '\'')
            }
            c if c.is_ascii_lowercase() || c == '\'' => frame.juxtaposable,
            _ => false,
        }
    }

    fn simple(&mut self, ty: Type, pos: usize) -> Result<(), ParseError> {
        let frame = self.top();
        if let Some(star) = frame.pending_star.take() {
            let members = match frame.slot().take() {
                Some(Type::Product(mut members)) => {
                    members.push(ty);
                    members
                }
                Some(previous) => vec![previous, ty],
                None => {
                    return Err(ParseError::syntax(
                        "a product needs a type before the '*'",
                        star,
                    ));
                }
            };
            *frame.slot() = Some(Type::product(members));
            frame.juxtaposable = false;
            return Ok(());
        }

        let juxtaposable = frame.juxtaposable;
        match frame.slot().take() {
            None => {
                *frame.slot() = Some(ty);
                frame.juxtaposable = true;
                Ok(())
            }
            Some(previous) if juxtaposable && previous.is_simple() => {
                *frame.slot() = Some(Type::composite(previous, ty));
                frame.juxtaposable = false;
                Ok(())
            }
            Some(previous) => Err(ParseError::syntax(
                format!(
                    "unexpected '{}' after the type {}; only two simple types can be juxtaposed, use <..,..> for anything larger",
                    ty, previous
                ),
                pos,
            )),
        }
    }

    fn open_bracket(&mut self, pos: usize) -> Result<(), ParseError> {
        let frame = self.top();
        if frame.pending_star.is_some() {
            return Err(ParseError::syntax(
                "products may only combine atomic types and type variables, not <..> types",
                pos,
            ));
        }
        if let Some(previous) = frame.slot_ref() {
            return Err(ParseError::syntax(
                format!(
                    "unexpected '<' after the type {}; expected a comma or '>'",
                    previous
                ),
                pos,
            ));
        }
        self.stack.push(Frame {
            opened_at: Some(pos),
            ..Frame::default()
        });
        Ok(())
    }

    fn comma(&mut self, pos: usize) -> Result<(), ParseError> {
        let frame = self.top();
        if frame.opened_at.is_none() {
            return Err(ParseError::syntax(
                "a comma may only appear inside angle brackets, as in <e,t>",
                pos,
            ));
        }
        if let Some(star) = frame.pending_star {
            return Err(ParseError::syntax("missing a type after the '*'", star));
        }
        if frame.comma {
            return Err(ParseError::syntax(
                "a composite type has exactly one comma; use nested brackets, as in <e,<e,t>>",
                pos,
            ));
        }
        if frame.left.is_none() {
            return Err(ParseError::syntax("missing a type before the comma", pos));
        }
        frame.comma = true;
        frame.juxtaposable = false;
        Ok(())
    }

    fn close_bracket(&mut self, pos: usize) -> Result<(), ParseError> {
        let frame = self.top();
        if frame.opened_at.is_none() {
            return Err(ParseError::syntax("'>' without a matching '<'", pos));
        }
        if let Some(star) = frame.pending_star {
            return Err(ParseError::syntax("missing a type after the '*'", star));
        }
        if !frame.comma {
            return Err(ParseError::syntax(
                "expected a comma before '>'; a composite type looks like <e,t>",
                pos,
            ));
        }
        if frame.right.is_none() {
            return Err(ParseError::syntax("missing a type after the comma", pos));
        }

        let Some(frame) = self.stack.pop() else {
            unreachable!("the outermost frame is never popped");
        };
        let (Some(left), Some(right)) = (frame.left, frame.right) else {
            unreachable!("both halves were checked above");
        };
        let parent = self.top();
        *parent.slot() = Some(Type::composite(left, right));
        parent.juxtaposable = false;
        Ok(())
    }

    fn star(&mut self, pos: usize) -> Result<(), ParseError> {
        let frame = self.top();
        if frame.pending_star.is_some() {
            return Err(ParseError::syntax("two '*' in a row", pos));
        }
        match frame.slot_ref() {
            None => Err(ParseError::syntax(
                "a product needs a type before the '*'",
                pos,
            )),
            Some(Type::Composite(..)) => Err(ParseError::syntax(
                "products may only combine atomic types and type variables, not <..> types",
                pos,
            )),
            Some(_) => {
                frame.pending_star = Some(pos);
                frame.juxtaposable = false;
                Ok(())
            }
        }
    }

    fn finish(mut self, pos: usize) -> Result<Type, ParseError> {
        if let Some(opened) = self.stack.last().and_then(|f| f.opened_at) {
            return Err(ParseError::syntax(
                format!("the '<' at position {} is never closed", opened),
                pos,
            ));
        }
        let frame = self.top();
        if let Some(star) = frame.pending_star {
            return Err(ParseError::syntax("missing a type after the '*'", star));
        }
        frame
            .left
            .take()
            .ok_or_else(|| ParseError::syntax("expected a type", pos))
    }
}
