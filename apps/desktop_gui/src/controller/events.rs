//! Backend-to-UI events and error modeling for the desktop GUI controller.

use shared::domain::{PlannedMeal, PlannedMealId, Recipe};

use crate::media::PreviewImage;

#[derive(Debug, Clone)]
pub enum UiEvent {
    Info(String),
    CatalogUpdated {
        generation: u64,
        recipes: Vec<Recipe>,
    },
    PlannedMealsUpdated(Vec<PlannedMeal>),
    PlannedMealAdded {
        title: String,
    },
    PlannedMealRemoved(PlannedMealId),
    RemovalFailed {
        id: PlannedMealId,
        error: UiError,
    },
    ImageLoaded {
        url: String,
        image: PreviewImage,
    },
    ImageFailed {
        url: String,
        reason: String,
    },
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Server,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Catalog,
    PlannedMeal,
    General,
}

impl UiErrorContext {
    fn label(self) -> &'static str {
        match self {
            UiErrorContext::BackendStartup => "Startup",
            UiErrorContext::Catalog => "Recipes",
            UiErrorContext::PlannedMeal => "Planned meal",
            UiErrorContext::General => "Error",
        }
    }
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains(" returned ") {
            UiErrorCategory::Server
        } else if message_lower.contains("request to")
            || message_lower.contains("connection")
            || message_lower.contains("timed out")
            || message_lower.contains("dns")
        {
            UiErrorCategory::Transport
        } else if message_lower.contains("invalid")
            || message_lower.contains("malformed")
            || message_lower.contains("not in the current catalog")
        {
            UiErrorCategory::Validation
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// One line suitable for the status banner.
    pub fn banner_text(&self) -> String {
        let hint = match self.category {
            UiErrorCategory::Transport => " (is the recipe API running?)",
            _ => "",
        };
        format!("{}: {}{hint}", self.context.label(), self.message)
    }
}
