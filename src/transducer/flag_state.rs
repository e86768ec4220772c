use hashbrown::HashMap;
use smol_str::SmolStr;

use super::alphabet::{FlagDiacriticOperation, FlagDiacriticOperator};

type Frame = HashMap<SmolStr, (SmolStr, bool)>;

/// The stack of `feature -> (value, polarity)` frames pushed and popped
/// during search (§3 `FlagState stack`, §4.3).
///
/// `push` either duplicates the top frame (applying the operation) and
/// returns `true`, or leaves the stack untouched and returns `false`. The
/// caller is responsible for calling `pop` after exploring the branch that a
/// successful `push` opened up — this mirrors the push/pop discipline of
/// the surrounding depth-first search.
#[derive(Debug)]
pub struct FlagDiacriticState {
    stack: Vec<Frame>,
}

impl Default for FlagDiacriticState {
    fn default() -> Self {
        FlagDiacriticState {
            stack: vec![Frame::new()],
        }
    }
}

impl FlagDiacriticState {
    pub fn new() -> FlagDiacriticState {
        FlagDiacriticState::default()
    }

    #[inline]
    fn top(&self) -> &Frame {
        self.stack.last().expect("flag state stack is never empty")
    }

    pub fn push(&mut self, op: &FlagDiacriticOperation) -> bool {
        use FlagDiacriticOperator::*;

        match op.operation {
            P => {
                let mut frame = self.top().clone();
                frame.insert(op.feature.clone(), (op.value.clone(), true));
                self.stack.push(frame);
                true
            }
            N => {
                let mut frame = self.top().clone();
                frame.insert(op.feature.clone(), (op.value.clone(), false));
                self.stack.push(frame);
                true
            }
            R => {
                let allowed = if op.value.is_empty() {
                    self.top().contains_key(&op.feature)
                } else {
                    self.top().get(&op.feature) == Some(&(op.value.clone(), true))
                };
                if allowed {
                    self.stack.push(self.top().clone());
                }
                allowed
            }
            D => {
                let allowed = if op.value.is_empty() {
                    !self.top().contains_key(&op.feature)
                } else {
                    self.top().get(&op.feature) != Some(&(op.value.clone(), true))
                };
                if allowed {
                    self.stack.push(self.top().clone());
                }
                allowed
            }
            C => {
                let mut frame = self.top().clone();
                frame.remove(&op.feature);
                self.stack.push(frame);
                true
            }
            U => {
                let unifiable = match self.top().get(&op.feature) {
                    None => true,
                    Some((v, true)) => *v == op.value,
                    Some((v, false)) => *v != op.value,
                };
                if unifiable {
                    let mut frame = self.top().clone();
                    frame.insert(op.feature.clone(), (op.value.clone(), true));
                    self.stack.push(frame);
                }
                unifiable
            }
        }
    }

    pub fn pop(&mut self) {
        self.stack.pop();
        debug_assert!(!self.stack.is_empty(), "popped the base flag state frame");
    }
}
