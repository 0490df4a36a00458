//! Decorators: conditionally visible chrome drawn above a property.

use core::fmt;

use crate::{Area, Attribute, MessageKind, Metrics, PropertyView, Ui};
use crate::trace;

/// Auxiliary chrome drawn above a property, such as a validation message.
pub trait Decorator {
    /// Whether the decorator shows for the property's current value.
    fn is_visible(&self, view: &PropertyView) -> bool;

    /// Height reserved while visible.
    fn height(&self, metrics: &Metrics) -> f32;

    /// Draw into `area`, which is exactly [`Decorator::height`] tall.
    fn draw(&self, ui: &mut dyn Ui, view: &PropertyView, area: Area);
}

/// Flags a property that still holds its empty value (null, `false`, `0`,
/// `""`, or an empty array).
#[derive(Debug, Clone, Default)]
pub struct RequiredDecorator {
    message: Option<String>,
}

impl RequiredDecorator {
    /// A decorator with the default `"<Name> is required!"` message.
    pub fn new() -> Self {
        Self::default()
    }

    /// A decorator with a custom message.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    /// The message shown for `view`.
    pub fn message(&self, view: &PropertyView) -> String {
        match &self.message {
            Some(message) => message.clone(),
            None => format!("{} is required!", view.label()),
        }
    }
}

impl Decorator for RequiredDecorator {
    fn is_visible(&self, view: &PropertyView) -> bool {
        view.values()
            .is_some_and(|values| values.iter().any(|value| value.is_default()))
    }

    fn height(&self, metrics: &Metrics) -> f32 {
        metrics.decorator_height
    }

    fn draw(&self, ui: &mut dyn Ui, view: &PropertyView, area: Area) {
        ui.help_box(&self.message(view), MessageKind::Error, area);
    }
}

/// The decorators of one property, run in order above its body.
#[derive(Default)]
pub struct DecoratorChain {
    decorators: Vec<Box<dyn Decorator>>,
}

impl DecoratorChain {
    /// The decorators implied by a member's attributes.
    pub fn from_attributes(attributes: &[Attribute]) -> Self {
        let mut chain = Self::default();
        for attribute in attributes {
            if let Attribute::Required { message } = attribute {
                let decorator = match message {
                    Some(message) => RequiredDecorator::with_message(message.clone()),
                    None => RequiredDecorator::new(),
                };
                chain.push(decorator);
            }
        }
        chain
    }

    /// Append a decorator.
    pub fn push(&mut self, decorator: impl Decorator + 'static) {
        self.decorators.push(Box::new(decorator));
    }

    /// Number of decorators, visible or not.
    pub fn len(&self) -> usize {
        self.decorators.len()
    }

    /// Whether the chain has no decorators.
    pub fn is_empty(&self) -> bool {
        self.decorators.is_empty()
    }

    /// Total height of the decorators visible for `view`.
    pub fn height(&self, view: &PropertyView, metrics: &Metrics) -> f32 {
        self.decorators
            .iter()
            .filter(|d| d.is_visible(view))
            .map(|d| d.height(metrics))
            .sum()
    }

    /// Draw every visible decorator at the top of `area`, then call `next`
    /// exactly once with what is left of the area.
    pub fn draw<R>(
        &self,
        ui: &mut dyn Ui,
        view: &PropertyView,
        area: Area,
        metrics: &Metrics,
        next: impl FnOnce(&mut dyn Ui, Area) -> R,
    ) -> R {
        let mut rest = area;
        for decorator in &self.decorators {
            if !decorator.is_visible(view) {
                continue;
            }
            let (slice, below) = rest.split_top(decorator.height(metrics));
            trace!("decorating `{}`", view.meta().path());
            decorator.draw(ui, view, slice);
            rest = below;
        }
        next(ui, rest)
    }
}

impl fmt::Debug for DecoratorChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecoratorChain")
            .field("len", &self.decorators.len())
            .finish()
    }
}
