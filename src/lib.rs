//! # vis-recipe: Visualization Recipe Resolution
//!
//! Decides, for one biological dataset, which of the portal's specialized
//! renderers applies, before any heavy rendering work starts. The answer is
//! a [`Recipe`]: an opaque name the host maps to a renderer.
//!
//! ## Design Principles
//!
//! 1. **One answer**: every resolution yields exactly one `Recipe`; `Recipe::Null`
//!    means "no visualization" and is not an error
//! 2. **Order is the contract**: overlapping hints are settled by fixed rule precedence
//! 3. **Bounded I/O**: the only lookups go through [`AssayFetch`], memoized per call,
//!    never further up the lineage than one level
//! 4. **Names, not renderers**: binding recipes to renderers is the host's
//!    [`RecipeRegistry`]
//!
//! ## Quick Start
//!
//! ```rust
//! use vis_recipe::{AssayDescriptor, Context, EntityRef, MemoryCatalog, Recipe, Resolver};
//!
//! # fn example() -> vis_recipe::Result<()> {
//! let catalog = MemoryCatalog::new()
//!     .with_assay("parent-uuid", AssayDescriptor::new("MALDI-IMS"));
//! let resolver = Resolver::new(catalog);
//!
//! let support = EntityRef::new("support-uuid").with_raw_hints(["is_support", "is_image"]);
//! let recipe = resolver.resolve(&support, &Context::new().with_parent("parent-uuid"))?;
//! assert_eq!(recipe, Recipe::Ims);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Pipeline
//!
//! | Step | Module | Fetches |
//! |------|--------|---------|
//! | uuid validation | `model::entity` | - |
//! | object-by-analyte short-circuit | `resolve` | - |
//! | lineage walk | `lineage` | parent assay, once |
//! | decision tree | `resolve` | immediate ancestors, once each |
//! | EPIC overlay | `overlay` | - |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod fetch;
pub mod config;
pub mod ancestor;
pub mod lineage;
pub mod resolve;
pub mod overlay;
pub mod registry;
pub mod lifting;

use serde::Serialize;
use tracing::debug;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{
    AssayDescriptor, EntityRef, FileEntry, Hint, HintSet, OverlayRecipe,
    ParentRef, Provenance, ProvenanceStep, Recipe,
};

// ============================================================================
// Re-exports: Fetch, config, components
// ============================================================================

pub use fetch::{AssayFetch, MemoryCatalog, NoFetch};
pub use config::ResolverConfig;
pub use ancestor::AncestorResolver;
pub use lineage::{Lineage, LineageWalker, SegmentationStyle};
pub use resolve::RecipeResolver;
pub use overlay::{select_overlay, EpicCategory};
pub use registry::RecipeRegistry;
pub use lifting::PagePlan;

// ============================================================================
// Resolution context and result
// ============================================================================

/// Optional per-request context: the parent a support dataset is lifted
/// onto, and the EPIC the dataset belongs to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    pub parent: Option<ParentRef>,
    pub epic_id: Option<String>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parent(mut self, parent: impl Into<ParentRef>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_epic(mut self, epic_id: impl Into<String>) -> Self {
        self.epic_id = Some(epic_id.into());
        self
    }
}

/// Everything one resolution decided.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub uuid: String,
    pub recipe: Recipe,
    pub lineage: Lineage,
    /// Set when an EPIC id was supplied and the primary recipe renders something.
    pub overlay: Option<OverlayRecipe>,
    /// Assay fetches this resolution issued.
    pub ancestor_fetches: usize,
}

impl Resolution {
    pub fn has_visualization(&self) -> bool {
        !self.recipe.is_null()
    }
}

// ============================================================================
// Top-level Resolver handle
// ============================================================================

/// The primary entry point. A `Resolver` wraps a fetch capability and a
/// configuration; it holds no per-request state and can be shared across
/// threads when `F` can.
pub struct Resolver<F: AssayFetch> {
    fetch: F,
    config: ResolverConfig,
}

impl<F: AssayFetch> Resolver<F> {
    /// Create a Resolver with the default configuration.
    pub fn new(fetch: F) -> Self {
        Self { fetch, config: ResolverConfig::default() }
    }

    /// Create a Resolver with an explicit configuration.
    pub fn with_config(fetch: F, config: ResolverConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { fetch, config })
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Access the underlying fetch capability.
    pub fn fetch(&self) -> &F {
        &self.fetch
    }

    /// Resolve the recipe for `entity`.
    pub fn resolve(&self, entity: &EntityRef, ctx: &Context) -> Result<Recipe> {
        Ok(self.resolve_detailed(entity, ctx)?.recipe)
    }

    /// Resolve and report how the answer was reached.
    pub fn resolve_detailed(&self, entity: &EntityRef, ctx: &Context) -> Result<Resolution> {
        run(&self.config, &self.fetch, entity, ctx.parent.as_ref(), ctx.epic_id.as_deref())
    }

    /// Whether `entity` has any visualization: exactly `resolve(..) != Null`.
    pub fn has_visualization(&self, entity: &EntityRef, ctx: &Context) -> Result<bool> {
        Ok(!self.resolve(entity, ctx)?.is_null())
    }

    pub fn select_overlay(&self, epic_id: Option<&str>) -> Result<OverlayRecipe> {
        overlay::select_overlay(epic_id)
    }
}

// ============================================================================
// Free functions (default configuration)
// ============================================================================

/// Resolve with the default configuration and a borrowed fetch capability.
pub fn resolve<F: AssayFetch + ?Sized>(
    entity: &EntityRef,
    fetch: &F,
    parent: Option<&ParentRef>,
    epic_id: Option<&str>,
) -> Result<Recipe> {
    Ok(run(&ResolverConfig::default(), fetch, entity, parent, epic_id)?.recipe)
}

/// `resolve(..) != Recipe::Null`, with the same arguments.
pub fn has_visualization<F: AssayFetch + ?Sized>(
    entity: &EntityRef,
    fetch: &F,
    parent: Option<&ParentRef>,
    epic_id: Option<&str>,
) -> Result<bool> {
    Ok(!resolve(entity, fetch, parent, epic_id)?.is_null())
}

/// One resolution. Owns the ancestor memo; it is dropped on return.
fn run<F: AssayFetch + ?Sized>(
    config: &ResolverConfig,
    fetch: &F,
    entity: &EntityRef,
    parent: Option<&ParentRef>,
    epic_id: Option<&str>,
) -> Result<Resolution> {
    let uuid = entity.require_uuid()?;
    let mut ancestors = AncestorResolver::new(fetch);

    // An explicit parent wins over one recorded on the entity.
    let parent = parent
        .or(entity.parent.as_ref())
        .filter(|p| !matches!(p, ParentRef::Uuid(u) if u.is_empty()));

    let (recipe, lineage) = if RecipeResolver::is_object_by_analyte(&entity.hints) {
        (Recipe::ObjectByAnalyte, Lineage::Direct)
    } else {
        let lineage = LineageWalker::new(config).walk(entity, parent, epic_id, &mut ancestors)?;
        match lineage.recipe() {
            Some(recipe) => (recipe, lineage),
            None => (RecipeResolver::new(config).resolve(entity, &mut ancestors)?, lineage),
        }
    };

    let overlay = match epic_id {
        Some(id) if !recipe.is_null() => Some(overlay::select_overlay(Some(id))?),
        _ => None,
    };

    debug!(uuid, %recipe, ?overlay, fetches = ancestors.fetch_count(), "resolution complete");
    Ok(Resolution {
        uuid: uuid.to_string(),
        recipe,
        lineage,
        overlay,
        ancestor_fetches: ancestors.fetch_count(),
    })
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Provided entity does not have a uuid")]
    MissingUuid,

    #[error("epic_uuid must be provided")]
    MissingEpicId,

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    #[error("Unknown recipe: {0}")]
    UnknownRecipe(String),

    #[error("No renderer registered for recipe {0}")]
    UnboundRecipe(Recipe),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Bad caller input: raised before any lookup, never defaulted.
    pub fn is_input_validation(&self) -> bool {
        matches!(self, Error::MissingUuid | Error::MissingEpicId)
    }

    /// Failures that can only come out of an [`AssayFetch`] implementation.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            Error::Fetch(_) | Error::NotFound(_) | Error::MalformedRecord(_) | Error::Json(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
