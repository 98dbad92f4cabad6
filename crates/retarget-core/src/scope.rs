//! Explicit scope stack.
//!
//! Passes never keep "current class" or "current function" pointers around.
//! They push frames, take a [`ScopeMark`] before recursing, and restore to
//! it afterwards, so a recursive or speculative call cannot leak frames into
//! its siblings.

use retarget_model::ClassId;

/// Class referenced by a frame: one of ours, or a type from outside the program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassRef {
    Program(ClassId),
    External(String),
}

impl ClassRef {
    pub fn id(&self) -> Option<ClassId> {
        match self {
            ClassRef::Program(id) => Some(*id),
            ClassRef::External(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Class(ClassRef),
    Function { class: ClassId, index: usize },
    Variable { class: ClassId, index: usize },
}

/// Depth snapshot returned by [`ScopeStack::mark`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[must_use = "a mark does nothing unless it is restored"]
pub struct ScopeMark(usize);

impl ScopeMark {
    pub fn depth(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScopeStack {
    frames: Vec<Frame>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn mark(&self) -> ScopeMark {
        ScopeMark(self.frames.len())
    }

    pub fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    /// Drop every frame pushed since `mark`.
    pub fn restore(&mut self, mark: ScopeMark) {
        self.frames.truncate(mark.0);
    }

    /// Run `f` and restore the stack to its depth before the call.
    pub fn isolated<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let mark = self.mark();
        let out = f(self);
        self.restore(mark);
        out
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Innermost program class frame.
    pub fn current_class(&self) -> Option<ClassId> {
        self.frames.iter().rev().find_map(|f| match f {
            Frame::Class(ClassRef::Program(id)) => Some(*id),
            _ => None,
        })
    }

    /// Innermost function frame.
    pub fn current_function(&self) -> Option<(ClassId, usize)> {
        self.frames.iter().rev().find_map(|f| match f {
            Frame::Function { class, index } => Some((*class, *index)),
            _ => None,
        })
    }

    /// Innermost variable (accessor) frame.
    pub fn current_variable(&self) -> Option<(ClassId, usize)> {
        self.frames.iter().rev().find_map(|f| match f {
            Frame::Variable { class, index } => Some((*class, *index)),
            _ => None,
        })
    }

    /// Class whose members are being lowered: the function's or accessor's
    /// owner, ignoring receiver frames above it.
    pub fn member_owner(&self) -> Option<ClassId> {
        self.frames.iter().rev().find_map(|f| match f {
            Frame::Function { class, .. } | Frame::Variable { class, .. } => Some(*class),
            _ => None,
        })
    }

    /// Receiver of a member-access chain: a class frame pushed on top of
    /// the innermost function or accessor frame.
    pub fn receiver(&self) -> Option<&ClassRef> {
        match self.frames.last() {
            Some(Frame::Class(class)) => {
                let has_member_frame = self.frames.iter().any(|f| {
                    matches!(f, Frame::Function { .. } | Frame::Variable { .. })
                });
                has_member_frame.then_some(class)
            }
            _ => None,
        }
    }
}
