//! Form extraction gated by a validation schema.

use axum::extract::{FromRequest, Request};
use axum::Form;
use wl_core::error::AppError;
use wl_core::validation::Schema;

use crate::error::ErrorPage;

/// A urlencoded form body that passed schema `F`.
///
/// Rejects with a 400 page listing every violated field, before the handler
/// (and therefore storage) is ever reached.
pub struct Validated<F: Schema>(pub F::Output);

impl<S, F> FromRequest<S> for Validated<F>
where
    S: Send + Sync,
    F: Schema + 'static,
{
    type Rejection = ErrorPage;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(form) = Form::<F>::from_request(req, state)
            .await
            .map_err(|rejection| ErrorPage::new(rejection.status(), rejection.body_text()))?;

        let output = form.validate().map_err(AppError::from)?;
        Ok(Validated(output))
    }
}
