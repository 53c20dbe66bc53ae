// =============================================================================
// Model
// =============================================================================
//
// The slice of a regression model the prior scaler needs: the family, the
// observed response, and one component per distributional parameter.
//
// COMPONENTS
// ----------
// Every parameter of the response distribution is a component:
//
//   - Distributional: the parameter has its own linear predictor
//     (intercept + common terms + group-specific terms). The family's parent
//     parameter ("mu", "p") is always distributional.
//   - Constant: the parameter is a single unknown (or fixed number) with one
//     prior, e.g. "sigma" in a Gaussian model or "threshold" in an ordinal one.
//
// =============================================================================

use std::collections::BTreeMap;

use crate::error::{AutoPriorError, Result};
use crate::families::Family;
use crate::priors::ComponentPrior;
use crate::terms::{CommonTerm, GroupSpecificTerm, InterceptTerm, ResponseTerm};

/// A non-hierarchical parameter with a single prior.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantComponent {
    pub name: String,
    pub prior: ComponentPrior,
}

impl ConstantComponent {
    pub fn new(name: impl Into<String>, prior: impl Into<ComponentPrior>) -> Self {
        Self {
            name: name.into(),
            prior: prior.into(),
        }
    }
}

/// A parameter driven by its own linear predictor.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DistributionalComponent {
    pub name: String,
    pub intercept: Option<InterceptTerm>,
    /// Common terms, in design-matrix order.
    pub common_terms: Vec<CommonTerm>,
    /// Group-specific terms, in design-matrix order.
    pub group_specific_terms: Vec<GroupSpecificTerm>,
}

impl DistributionalComponent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_intercept(mut self, intercept: InterceptTerm) -> Self {
        self.intercept = Some(intercept);
        self
    }

    pub fn with_common(mut self, term: CommonTerm) -> Self {
        self.common_terms.push(term);
        self
    }

    pub fn with_group_specific(mut self, term: GroupSpecificTerm) -> Self {
        self.group_specific_terms.push(term);
        self
    }

    pub fn common_term(&self, name: &str) -> Option<&CommonTerm> {
        self.common_terms.iter().find(|t| t.name == name)
    }

    pub fn group_specific_term(&self, name: &str) -> Option<&GroupSpecificTerm> {
        self.group_specific_terms.iter().find(|t| t.name == name)
    }
}

/// One model component.
#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    Constant(ConstantComponent),
    Distributional(DistributionalComponent),
}

impl Component {
    pub fn name(&self) -> &str {
        match self {
            Component::Constant(c) => &c.name,
            Component::Distributional(c) => &c.name,
        }
    }
}

impl From<ConstantComponent> for Component {
    fn from(c: ConstantComponent) -> Self {
        Component::Constant(c)
    }
}

impl From<DistributionalComponent> for Component {
    fn from(c: DistributionalComponent) -> Self {
        Component::Distributional(c)
    }
}

// =============================================================================
// Model
// =============================================================================

/// Family, response, and named components of a regression model.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub family: Family,
    pub response: ResponseTerm,
    components: BTreeMap<String, Component>,
}

impl Model {
    pub fn new(family: Family, response: ResponseTerm) -> Self {
        Self {
            family,
            response,
            components: BTreeMap::new(),
        }
    }

    /// Builder: add (or replace) a component, keyed by its name.
    pub fn with_component(mut self, component: impl Into<Component>) -> Self {
        let component = component.into();
        self.components
            .insert(component.name().to_string(), component);
        self
    }

    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.components.values()
    }

    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.get(name)
    }

    /// Component `name` if it is constant.
    pub fn constant(&self, name: &str) -> Option<&ConstantComponent> {
        match self.components.get(name) {
            Some(Component::Constant(c)) => Some(c),
            _ => None,
        }
    }

    pub(crate) fn constant_mut(&mut self, name: &str) -> Option<&mut ConstantComponent> {
        match self.components.get_mut(name) {
            Some(Component::Constant(c)) => Some(c),
            _ => None,
        }
    }

    /// The component of the family's parent parameter.
    pub fn parent_component(&self) -> Option<&DistributionalComponent> {
        match self.components.get(self.family.parent()) {
            Some(Component::Distributional(c)) => Some(c),
            _ => None,
        }
    }

    pub(crate) fn parent_component_mut(&mut self) -> Option<&mut DistributionalComponent> {
        match self.components.get_mut(self.family.parent()) {
            Some(Component::Distributional(c)) => Some(c),
            _ => None,
        }
    }

    /// Check that every design block has one row per response observation.
    pub fn validate(&self) -> Result<()> {
        let n = self.response.data.len();
        for component in self.components.values() {
            let Component::Distributional(c) = component else {
                continue;
            };
            let common = c.common_terms.iter().map(|t| (&t.name, t.data.nrows()));
            let group = c
                .group_specific_terms
                .iter()
                .map(|t| (&t.name, t.predictor.nrows()));
            for (name, rows) in common.chain(group) {
                if rows != n {
                    return Err(AutoPriorError::DimensionMismatch(format!(
                        "term '{}' has {} rows but the response has {} observations",
                        name, rows, n
                    )));
                }
            }
        }
        Ok(())
    }
}
