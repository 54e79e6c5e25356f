use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::ExpressionError;
use crate::expression::{self, CompiledFunction};
use crate::theme::Rgb;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EquationId(Uuid);

impl EquationId {
    fn fresh() -> Self {
        EquationId(Uuid::new_v4())
    }
}

impl fmt::Display for EquationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A plotted equation. `function` is always the compilation of `expression`.
#[derive(Clone, Debug)]
pub struct Equation {
    pub id: EquationId,
    /// Trimmed text as the user typed it.
    pub expression: String,
    pub function: CompiledFunction,
    pub color: Rgb,
}

/// Outcome of [`EquationList::edit`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditOutcome {
    /// The new text compiled and replaced the old function.
    Replaced,
    /// The new text matched the current text; nothing was recompiled.
    Unchanged,
    NotFound,
}

/// Equations in the order they were added.
#[derive(Clone, Debug, Default)]
pub struct EquationList {
    equations: Vec<Equation>,
    /// Equations ever added, used to pick the next palette colour.
    added: usize,
}

impl EquationList {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many equations have ever been added, including removed ones.
    pub fn added_count(&self) -> usize {
        self.added
    }

    /// Validates `text` and appends it. On error the list is untouched.
    pub fn add(&mut self, text: &str, color: Rgb) -> Result<EquationId, ExpressionError> {
        let function = expression::validate(text)?;
        let id = EquationId::fresh();
        self.equations.push(Equation {
            id,
            expression: text.trim().to_string(),
            function,
            color,
        });
        self.added += 1;
        info!("added equation {} ({})", id, text.trim());
        Ok(id)
    }

    /// Replaces the text of an existing equation.
    ///
    /// Editing to the current text is a no-op. If the new text does not
    /// validate, the previous function stays in place and the error is returned.
    pub fn edit(&mut self, id: EquationId, text: &str) -> Result<EditOutcome, ExpressionError> {
        let Some(equation) = self.equations.iter_mut().find(|e| e.id == id) else {
            return Ok(EditOutcome::NotFound);
        };
        let trimmed = text.trim();
        if trimmed == equation.expression {
            debug!("edit of {} left the text unchanged", id);
            return Ok(EditOutcome::Unchanged);
        }

        match expression::validate(trimmed) {
            Ok(function) => {
                equation.expression = trimmed.to_string();
                equation.function = function;
                info!("equation {} is now {}", id, trimmed);
                Ok(EditOutcome::Replaced)
            }
            Err(e) => {
                warn!("kept previous function for {}: {}", id, e);
                Err(e)
            }
        }
    }

    pub fn remove(&mut self, id: EquationId) -> bool {
        let before = self.equations.len();
        self.equations.retain(|e| e.id != id);
        self.equations.len() != before
    }

    pub fn set_color(&mut self, id: EquationId, color: Rgb) -> bool {
        match self.equations.iter_mut().find(|e| e.id == id) {
            Some(equation) => {
                equation.color = color;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: EquationId) -> Option<&Equation> {
        self.equations.iter().find(|e| e.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Equation> {
        self.equations.iter()
    }

    pub fn len(&self) -> usize {
        self.equations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.equations.is_empty()
    }
}
