//! Recipe → renderer binding.
//!
//! The resolver only names recipes. Hosts register whatever builds the
//! visualization for each one (a constructor, a trait object, a URL
//! template) and look it up after resolution.

use hashbrown::HashMap;

use crate::model::Recipe;
use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct RecipeRegistry<T> {
    bindings: HashMap<Recipe, T>,
}

impl<T> Default for RecipeRegistry<T> {
    fn default() -> Self {
        Self { bindings: HashMap::new() }
    }
}

impl<T> RecipeRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `recipe` to `renderer`, returning any previous binding.
    pub fn register(&mut self, recipe: Recipe, renderer: T) -> Option<T> {
        self.bindings.insert(recipe, renderer)
    }

    pub fn with(mut self, recipe: Recipe, renderer: T) -> Self {
        self.register(recipe, renderer);
        self
    }

    pub fn get(&self, recipe: Recipe) -> Option<&T> {
        self.bindings.get(&recipe)
    }

    /// Like `get`, but an unbound recipe is an error.
    pub fn bind(&self, recipe: Recipe) -> Result<&T> {
        self.get(recipe).ok_or(Error::UnboundRecipe(recipe))
    }

    /// Non-null recipes with no renderer, in declaration order.
    pub fn missing(&self) -> Vec<Recipe> {
        Recipe::ALL
            .into_iter()
            .filter(|r| !r.is_null() && !self.bindings.contains_key(r))
            .collect()
    }

    /// True when every recipe except `Null` has a renderer.
    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl RecipeRegistry<&'static str> {
    /// Every recipe bound to its historical builder name.
    pub fn builder_names() -> Self {
        Recipe::ALL.into_iter().map(|r| (r, r.builder_name())).collect()
    }
}

impl<T> FromIterator<(Recipe, T)> for RecipeRegistry<T> {
    fn from_iter<I: IntoIterator<Item = (Recipe, T)>>(iter: I) -> Self {
        Self { bindings: iter.into_iter().collect() }
    }
}
