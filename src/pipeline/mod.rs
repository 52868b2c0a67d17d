//! Command validation.
//!
//! Every command runs through an ordered chain of validators before the kitchen touches any
//! state. The first failure wins and its error is what the sender gets back.
//!
//! | Command             | Chain                                                    |
//! |---------------------|----------------------------------------------------------|
//! | `new_order`         | extract                                                  |
//! | `cancel_order`      | extract, order                                           |
//! | `confirm_delivery`  | extract, order                                           |
//! | `return_dish`       | extract, order, instance, definition                     |
//! | `start_preparation` | extract, order, instance, definition, station            |
//! | `mark_dish_done`    | extract, order, instance, definition, station            |

pub mod context;
pub mod validators;

pub use context::{Lookup, Origin, RequestContext, Resolved};
pub use validators::Field;

use crate::error::CommandError;
use crate::protocol::CommandKind;
use tracing::debug;

pub type Validator = for<'a> fn(&mut RequestContext<'a>, &Lookup<'a>) -> Result<(), CommandError>;

pub struct Pipeline {
    stages: Vec<(&'static str, Validator)>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    pub fn then(mut self, name: &'static str, validator: Validator) -> Self {
        self.stages.push((name, validator));
        self
    }

    /// The chain a command of `kind` must pass.
    pub fn for_command(kind: CommandKind) -> Self {
        let pipeline = Pipeline::new().then("extract", validators::extract_payload);
        match kind {
            CommandKind::NewOrder => pipeline,
            CommandKind::CancelOrder | CommandKind::ConfirmDelivery => {
                pipeline.then("order", validators::lookup_order)
            }
            CommandKind::ReturnDish => pipeline
                .then("order", validators::lookup_order)
                .then("instance", validators::lookup_instance)
                .then("definition", validators::resolve_definition),
            CommandKind::StartPreparation | CommandKind::MarkDishDone => pipeline
                .then("order", validators::lookup_order)
                .then("instance", validators::lookup_instance)
                .then("definition", validators::resolve_definition)
                .then("station", validators::authorize_station),
        }
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|(name, _)| *name).collect()
    }

    pub fn run<'a>(
        &self,
        mut ctx: RequestContext<'a>,
        lookup: &Lookup<'a>,
    ) -> Result<Resolved, CommandError> {
        for (name, validator) in &self.stages {
            if let Err(e) = validator(&mut ctx, lookup) {
                debug!(
                    command = %ctx.command,
                    origin = %ctx.origin.connection_id,
                    stage = *name,
                    error = %e,
                    "Validation failed"
                );
                return Err(e);
            }
        }
        Ok(ctx.into_resolved())
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
