//! Page-level planning: what a dataset's page should visualize.
//!
//! A primary dataset often has no imagery of its own; a derived support
//! dataset does. The host finds the most recent such descendant (QA or
//! Published, `is_support` + `is_image`) and hands it here, and the plan
//! lifts the descendant's visualization onto the primary page.

use serde::Serialize;
use tracing::{debug, info};

use crate::fetch::AssayFetch;
use crate::model::{EntityRef, ParentRef, Recipe};
use crate::{Context, Resolution, Resolver, Result};

/// What to render on a dataset page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "plan", rename_all = "snake_case")]
pub enum PagePlan {
    /// No files and no index-time visualization flag: nothing to resolve.
    Empty,
    /// A lifted descendant exists but its record lists no files.
    MissingFiles { uuid: String },
    /// Resolved either the entity itself or, when `vis_lifted_uuid` is set,
    /// the descendant it was lifted from.
    Resolved { resolution: Resolution, vis_lifted_uuid: Option<String> },
}

impl PagePlan {
    pub fn recipe(&self) -> Recipe {
        match self {
            PagePlan::Resolved { resolution, .. } => resolution.recipe,
            PagePlan::Empty | PagePlan::MissingFiles { .. } => Recipe::Null,
        }
    }

    pub fn vis_lifted_uuid(&self) -> Option<&str> {
        match self {
            PagePlan::Resolved { vis_lifted_uuid, .. } => vis_lifted_uuid.as_deref(),
            _ => None,
        }
    }

    /// Human-readable problem to show in place of a visualization, if any.
    pub fn error_message(&self) -> Option<String> {
        match self {
            PagePlan::MissingFiles { uuid } => Some(format!(
                "Related image entity {uuid} is missing file information (no \"files\" key found in its metadata)."
            )),
            _ => None,
        }
    }
}

impl<F: AssayFetch> Resolver<F> {
    /// Plan the visualization for `entity`'s page.
    ///
    /// `lifted_descendant` is the support dataset found by the host, if any.
    /// It is resolved with `entity` as its parent.
    pub fn plan_page(
        &self,
        entity: &EntityRef,
        lifted_descendant: Option<&EntityRef>,
        epic_id: Option<&str>,
    ) -> Result<PagePlan> {
        let uuid = entity.require_uuid()?;

        if let Some(descendant) = lifted_descendant {
            let descendant_uuid = descendant.require_uuid()?;
            if !descendant.has_files() {
                info!(uuid, descendant = descendant_uuid, "lifted descendant has no file information");
                return Ok(PagePlan::MissingFiles { uuid: descendant_uuid.to_string() });
            }

            let mut ctx = Context::new().with_parent(ParentRef::Entity(Box::new(entity.clone())));
            ctx.epic_id = epic_id.map(str::to_string);
            let resolution = self.resolve_detailed(descendant, &ctx)?;
            debug!(uuid, descendant = descendant_uuid, recipe = %resolution.recipe, "visualization lifted");
            return Ok(PagePlan::Resolved {
                resolution,
                vis_lifted_uuid: Some(descendant_uuid.to_string()),
            });
        }

        if !entity.has_files() && !entity.visualization {
            debug!(uuid, "no files and no visualization flag");
            return Ok(PagePlan::Empty);
        }

        let mut ctx = Context::new();
        ctx.epic_id = epic_id.map(str::to_string);
        let resolution = self.resolve_detailed(entity, &ctx)?;
        Ok(PagePlan::Resolved { resolution, vis_lifted_uuid: None })
    }
}
