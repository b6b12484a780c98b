//! Monthly manual entry routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use baltfin_db::ManualEntryRepository;
use baltfin_db::repositories::manual_entry::{ExpenseCellInput, RevenueCellInput};
use baltfin_shared::types::{Department, Direction, LogisticsStage, TransportType};

use crate::AppState;
use crate::routes::{bad_period, internal_error, parse_period};

/// Creates the manual entry routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/manual/revenues", get(list_revenues))
        .route("/manual/revenues", post(save_revenues))
        .route("/manual/expenses", get(list_expenses))
        .route("/manual/expenses", post(save_expenses))
}

/// Query parameters selecting the month.
#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    /// Month, `YYYY-MM`.
    pub period: String,
}

/// GET /manual/revenues?period=YYYY-MM.
async fn list_revenues(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> impl IntoResponse {
    let Some(period) = parse_period(&query.period) else {
        return bad_period(&query.period);
    };
    let repo = ManualEntryRepository::new(state.conn());
    match repo.list_revenues(period).await {
        Ok(rows) => {
            let body: Vec<_> = rows
                .into_iter()
                .map(|(entry, category)| json!({ "entry": entry, "category": category }))
                .collect();
            Json(body).into_response()
        }
        Err(e) => internal_error(&e),
    }
}

/// One revenue cell in a save request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueCellRequest {
    /// Income category.
    pub category_id: Uuid,
    /// Direction segment of the cell key.
    pub direction: Option<Direction>,
    /// Transport segment of the cell key.
    pub transport_type: Option<TransportType>,
    /// Amount; zero clears the cell.
    pub amount: Decimal,
}

/// Body for saving a month of revenue cells.
#[derive(Debug, Deserialize)]
pub struct SaveRevenuesRequest {
    /// Month, `YYYY-MM`.
    pub period: String,
    /// Cells to save.
    pub entries: Vec<RevenueCellRequest>,
}

/// POST /manual/revenues - save a month of revenue cells.
async fn save_revenues(
    State(state): State<AppState>,
    Json(body): Json<SaveRevenuesRequest>,
) -> impl IntoResponse {
    let Some(period) = parse_period(&body.period) else {
        return bad_period(&body.period);
    };
    let cells: Vec<RevenueCellInput> = body
        .entries
        .into_iter()
        .map(|cell| RevenueCellInput {
            category_id: cell.category_id,
            direction: cell.direction,
            transport_type: cell.transport_type,
            amount: cell.amount,
        })
        .collect();

    let repo = ManualEntryRepository::new(state.conn());
    match repo.save_revenues(period, &cells).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => internal_error(&e),
    }
}

/// Query parameters for the expense entry list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseListQuery {
    /// Month, `YYYY-MM`.
    pub period: String,
    /// Narrow to one department's cells.
    pub department: Option<Department>,
    /// Narrow to one logistics stage within the department.
    pub logistics_stage: Option<LogisticsStage>,
}

/// GET /manual/expenses?period=YYYY-MM.
async fn list_expenses(
    State(state): State<AppState>,
    Query(query): Query<ExpenseListQuery>,
) -> impl IntoResponse {
    let Some(period) = parse_period(&query.period) else {
        return bad_period(&query.period);
    };
    let repo = ManualEntryRepository::new(state.conn());
    match repo
        .list_expenses(period, query.department, query.logistics_stage)
        .await
    {
        Ok(rows) => {
            let body: Vec<_> = rows
                .into_iter()
                .map(|(entry, category)| json!({ "entry": entry, "category": category }))
                .collect();
            Json(body).into_response()
        }
        Err(e) => internal_error(&e),
    }
}

/// One expense cell in a save request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseCellRequest {
    /// Expense category.
    pub category_id: Uuid,
    /// Direction segment of the cell key.
    pub direction: Option<Direction>,
    /// Transport segment of the cell key.
    pub transport_type: Option<TransportType>,
    /// Amount; zero clears the cell.
    pub amount: Decimal,
    /// Optional note.
    pub comment: Option<String>,
}

/// Body for saving a month of expense cells.
#[derive(Debug, Deserialize)]
pub struct SaveExpensesRequest {
    /// Month, `YYYY-MM`.
    pub period: String,
    /// Cells to save.
    pub entries: Vec<ExpenseCellRequest>,
}

/// POST /manual/expenses - save a month of expense cells.
async fn save_expenses(
    State(state): State<AppState>,
    Json(body): Json<SaveExpensesRequest>,
) -> impl IntoResponse {
    let Some(period) = parse_period(&body.period) else {
        return bad_period(&body.period);
    };
    let cells: Vec<ExpenseCellInput> = body
        .entries
        .into_iter()
        .map(|cell| ExpenseCellInput {
            category_id: cell.category_id,
            direction: cell.direction,
            transport_type: cell.transport_type,
            amount: cell.amount,
            comment: cell.comment,
        })
        .collect();

    let repo = ManualEntryRepository::new(state.conn());
    match repo.save_expenses(period, &cells).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => internal_error(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revenue_cell_accepts_segmented_key() {
        let cell: RevenueCellRequest = serde_json::from_value(json!({
            "categoryId": "7a4c6f2e-1111-4d9b-9a55-3c0f8b2d6e01",
            "direction": "MSK_TO_KGD",
            "transportType": "FERRY",
            "amount": "45000",
        }))
        .unwrap();
        assert_eq!(cell.direction, Some(Direction::MskToKgd));
        assert_eq!(cell.transport_type, Some(TransportType::Ferry));
    }

    #[test]
    fn test_expense_cell_key_segments_default_to_none() {
        let cell: ExpenseCellRequest = serde_json::from_value(json!({
            "categoryId": "7a4c6f2e-1111-4d9b-9a55-3c0f8b2d6e01",
            "amount": "1200.50",
        }))
        .unwrap();
        assert_eq!(cell.direction, None);
        assert_eq!(cell.transport_type, None);
        assert_eq!(cell.comment, None);
    }

    #[test]
    fn test_expense_list_query_parses_subdivision_filter() {
        let query: ExpenseListQuery = serde_json::from_value(json!({
            "period": "2024-03",
            "department": "LOGISTICS_MSK",
            "logisticsStage": "MAINLINE",
        }))
        .unwrap();
        assert_eq!(query.department, Some(Department::LogisticsMsk));
        assert_eq!(query.logistics_stage, Some(LogisticsStage::Mainline));

        let bare: ExpenseListQuery =
            serde_json::from_value(json!({ "period": "2024-03" })).unwrap();
        assert_eq!(bare.department, None);
        assert_eq!(bare.logistics_stage, None);
    }
}
