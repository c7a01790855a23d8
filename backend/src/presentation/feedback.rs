//! User-facing feedback for cart mutations.
//!
//! An expired session always produces the same toast followed by a redirect
//! to the login endpoint; every other failure gets a per-action message.
//! Nothing is retried automatically.

use std::time::Duration;

use super::client::ClientError;

/// Where an unauthenticated visitor is sent.
pub const LOGIN_PATH: &str = "/api/login";
/// Delay between the "not signed in" toast and the redirect.
pub const LOGIN_REDIRECT_DELAY: Duration = Duration::from_millis(500);

/// Toast styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastVariant {
    /// Confirmation.
    Default,
    /// Failure.
    Destructive,
}

/// A transient notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Bold first line.
    pub title: &'static str,
    /// Explanatory second line.
    pub description: &'static str,
    pub variant: ToastVariant,
}

/// Navigation scheduled after a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redirect {
    /// Target path.
    pub to: &'static str,
    /// Delay so the toast is readable first.
    pub after: Duration,
}

/// The cart mutation being reported on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartAction {
    /// Add one unit from a product card.
    Add,
    /// Stepper change on the cart page.
    UpdateQuantity,
    /// Remove a line from the cart page.
    Remove,
}

/// Toast and optional redirect produced by a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Feedback {
    pub toast: Option<Toast>,
    pub redirect: Option<Redirect>,
}

impl Feedback {
    /// Whether the feedback reports a failure.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.toast
            .as_ref()
            .is_some_and(|toast| toast.variant == ToastVariant::Destructive)
    }
}

/// Feedback after `action` succeeded. Quantity changes are silent.
#[must_use]
pub fn success_feedback(action: CartAction) -> Feedback {
    let toast = match action {
        CartAction::Add => Some(Toast {
            title: "Aggiunto al carrello",
            description: "Il prodotto è stato aggiunto al tuo carrello",
            variant: ToastVariant::Default,
        }),
        CartAction::Remove => Some(Toast {
            title: "Rimosso dal carrello",
            description: "Il prodotto è stato rimosso dal carrello",
            variant: ToastVariant::Default,
        }),
        CartAction::UpdateQuantity => None,
    };
    Feedback {
        toast,
        redirect: None,
    }
}

/// Feedback after `action` failed with `error`.
///
/// # Examples
/// ```
/// use storefront::presentation::feedback::{CartAction, LOGIN_PATH, failure_feedback};
/// use storefront::presentation::ClientError;
///
/// let feedback = failure_feedback(CartAction::Add, &ClientError::unauthorized("login required"));
/// assert_eq!(feedback.redirect.map(|redirect| redirect.to), Some(LOGIN_PATH));
/// ```
#[must_use]
pub fn failure_feedback(action: CartAction, error: &ClientError) -> Feedback {
    if error.is_unauthorized() {
        return Feedback {
            toast: Some(Toast {
                title: "Non autenticato",
                description: "Effettua il login per continuare...",
                variant: ToastVariant::Destructive,
            }),
            redirect: Some(Redirect {
                to: LOGIN_PATH,
                after: LOGIN_REDIRECT_DELAY,
            }),
        };
    }

    let description = match action {
        CartAction::Add => "Impossibile aggiungere al carrello. Riprova.",
        CartAction::UpdateQuantity => "Impossibile aggiornare la quantità. Riprova.",
        CartAction::Remove => "Impossibile rimuovere il prodotto. Riprova.",
    };
    Feedback {
        toast: Some(Toast {
            title: "Errore",
            description,
            variant: ToastVariant::Destructive,
        }),
        redirect: None,
    }
}
