//! Skin quiz route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use dewdrop_core::ProductId;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::cart::CartView;
use crate::cart::NewCartItem;
use crate::catalog::{QuizQuestion, find_quiz_product, quiz_catalog, quiz_questions};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::latency;
use crate::middleware::Shopper;
use crate::quiz::{self, QuizAnswers, QuizResult, WizardView};
use crate::state::AppState;

/// Shown when no product fits the shopper's answers.
pub const NO_MATCH_MESSAGE: &str =
    "No products match your specific needs. Please try adjusting your answers.";

/// Answer request body.
#[derive(Debug, Deserialize)]
pub struct AnswerForm {
    pub value: String,
}

/// Submit request body.
///
/// Without `answers`, the answers collected by the step-by-step quiz are used.
#[derive(Debug, Default, Deserialize)]
pub struct SubmitForm {
    #[serde(default)]
    pub answers: Option<QuizAnswers>,
}

/// Quiz submission response.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub result: QuizResult,
    /// Set when there are no recommendations.
    pub message: Option<&'static str>,
    /// Earlier results, newest first.
    pub previous: Vec<QuizResult>,
}

/// List the quiz questions.
pub async fn questions() -> Json<&'static [QuizQuestion]> {
    Json(quiz_questions())
}

/// Show the shopper's progress through the quiz.
#[instrument(skip(shopper), fields(shopper_id = %shopper.id))]
pub async fn show(shopper: Shopper) -> Json<WizardView> {
    let session = shopper.session.lock().await;
    Json(session.quiz.view())
}

/// Answer the current question.
#[instrument(skip(shopper), fields(shopper_id = %shopper.id))]
pub async fn answer(shopper: Shopper, Json(form): Json<AnswerForm>) -> Json<WizardView> {
    let mut session = shopper.session.lock().await;
    session.quiz.answer(&form.value);
    Json(session.quiz.view())
}

/// Go back one question.
#[instrument(skip(shopper), fields(shopper_id = %shopper.id))]
pub async fn previous(shopper: Shopper) -> Json<WizardView> {
    let mut session = shopper.session.lock().await;
    session.quiz.previous();
    Json(session.quiz.view())
}

/// Start the quiz over.
#[instrument(skip(shopper), fields(shopper_id = %shopper.id))]
pub async fn reset(shopper: Shopper) -> Json<WizardView> {
    let mut session = shopper.session.lock().await;
    session.quiz.reset();
    Json(session.quiz.view())
}

/// Compute recommendations and record them in the shopper's history.
///
/// Results are held back by the configured quiz latency.
#[instrument(skip(state, shopper, form), fields(shopper_id = %shopper.id))]
pub async fn submit(
    State(state): State<AppState>,
    shopper: Shopper,
    Json(form): Json<SubmitForm>,
) -> Result<Json<SubmitResponse>> {
    let answers = match form.answers {
        Some(answers) => answers,
        None => shopper.session.lock().await.quiz.answers().clone(),
    };

    latency::delayed(state.latency().quiz, async {}).await;

    let mut session = shopper.session.lock().await;
    let (result, persisted) = quiz::submit(
        &mut session.quiz_history,
        quiz_catalog(),
        answers,
        Utc::now(),
    );
    persisted?;
    add_breadcrumb("quiz", "Submitted quiz", None);

    let message = result.recommendations.is_empty().then_some(NO_MATCH_MESSAGE);
    Ok(Json(SubmitResponse {
        result,
        message,
        previous: session.quiz_history.previous().to_vec(),
    }))
}

/// List past quiz results, newest first.
#[instrument(skip(shopper), fields(shopper_id = %shopper.id))]
pub async fn history(shopper: Shopper) -> Json<Vec<QuizResult>> {
    let session = shopper.session.lock().await;
    Json(session.quiz_history.results().to_vec())
}

/// Add a recommended product to the cart.
#[instrument(skip(shopper), fields(shopper_id = %shopper.id))]
pub async fn add_to_cart(shopper: Shopper, Path(id): Path<String>) -> Result<Json<CartView>> {
    let product = find_quiz_product(&ProductId::new(id.as_str()))
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let mut session = shopper.session.lock().await;
    session.cart.add_item(NewCartItem::from(product))?;
    Ok(Json(CartView::from(&session.cart)))
}
