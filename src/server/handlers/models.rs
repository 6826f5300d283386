//! Printer model listing.

use axum::Json;
use serde::Serialize;

use crate::printer::PrinterModel;

/// One selectable printer model.
#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub id: PrinterModel,
    pub name: &'static str,
    pub dpi: u16,
    pub blank_line_strips: usize,
}

/// GET /api/models - List supported printer models.
pub async fn list() -> Json<Vec<ModelInfo>> {
    Json(
        PrinterModel::all()
            .into_iter()
            .map(|id| {
                let config = id.config();
                ModelInfo {
                    id,
                    name: config.name,
                    dpi: config.dpi,
                    blank_line_strips: config.blank_line_strips,
                }
            })
            .collect(),
    )
}
