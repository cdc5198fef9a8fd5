//! Wire contract between roles: instruction in, outcome out.

use serde::Serialize;

use crate::role::Role;

/// Who produced an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "role", rename_all = "snake_case")]
pub enum Origin {
    /// Typed by the end user.
    User,
    /// Written by another role while handing over control.
    Role(Role),
}

/// A natural-language instruction handed to a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instruction {
    pub text: String,
    pub origin: Origin,
}

impl Instruction {
    /// An instruction typed by the end user.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            origin: Origin::User,
        }
    }

    /// An instruction written by `role`.
    pub fn from_role(role: Role, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            origin: Origin::Role(role),
        }
    }

    /// Returns true if the end user wrote this instruction.
    pub fn is_from_user(&self) -> bool {
        self.origin == Origin::User
    }
}

/// What a role does with an instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Final text for the end user. The responding role becomes active.
    Respond(String),
    /// Hand control to `to`, which may later return here.
    Delegate { to: Role, instruction: Instruction },
    /// Give control back to whichever role delegated here.
    Return(Instruction),
}

/// Whether a transition moved control forward or back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    Delegate,
    Return,
}

/// One recorded hop between roles within a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub from: Role,
    pub to: Role,
    pub kind: TransitionKind,
}

impl Transition {
    pub fn delegate(from: Role, to: Role) -> Self {
        Self {
            from,
            to,
            kind: TransitionKind::Delegate,
        }
    }

    pub fn returned(from: Role, to: Role) -> Self {
        Self {
            from,
            to,
            kind: TransitionKind::Return,
        }
    }
}
