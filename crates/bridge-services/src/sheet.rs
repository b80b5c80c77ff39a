use crate::{HostError, Result};
use bridge_runtime::BridgeSession;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Grid dimensions for one sheet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GridProperties {
    /// Number of rows.
    #[serde(default, rename = "rowCount")]
    pub row_count: u32,
    /// Number of columns.
    #[serde(default, rename = "columnCount")]
    pub column_count: u32,
}

/// Properties of one sheet within a spreadsheet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SheetProperties {
    /// Sheet identifier.
    #[serde(default, rename = "sheetId")]
    pub sheet_id: i64,
    /// Sheet title.
    #[serde(default)]
    pub title: String,
    /// Position within the spreadsheet.
    #[serde(default)]
    pub index: u32,
    /// Grid dimensions.
    #[serde(default, rename = "gridProperties")]
    pub grid_properties: GridProperties,
}

/// Metadata for one sheet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SheetMeta {
    /// Sheet properties.
    #[serde(default)]
    pub properties: SheetProperties,
}

/// Spreadsheet-level properties.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpreadsheetProperties {
    /// Spreadsheet title.
    #[serde(default)]
    pub title: String,
    /// Recalculation interval.
    #[serde(default, rename = "autoRecalc")]
    pub auto_recalc: Option<String>,
    /// Declared time zone.
    #[serde(default, rename = "timeZone")]
    pub time_zone: Option<String>,
}

/// Spreadsheet metadata as returned by the sheets API surface.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpreadsheetMeta {
    /// Spreadsheet identifier.
    #[serde(default, rename = "spreadsheetId")]
    pub spreadsheet_id: String,
    /// Spreadsheet-level properties.
    #[serde(default)]
    pub properties: SpreadsheetProperties,
    /// Contained sheets.
    #[serde(default)]
    pub sheets: Vec<SheetMeta>,
    /// Spreadsheet URL.
    #[serde(default, rename = "spreadsheetUrl")]
    pub spreadsheet_url: Option<String>,
}

/// Operations the emulated spreadsheet recognises but does not implement.
///
/// Only implemented operations exist as typed methods on [`Spreadsheet`];
/// everything here fails deterministically with the operation's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadsheetOp {
    Toast,
    AddMenu,
    RemoveMenu,
    InsertSheet,
    DeleteSheet,
    DuplicateActiveSheet,
    GetBandings,
    GetNamedRanges,
    SetNamedRange,
    GetProtections,
    CreateTextFinder,
    SetSpreadsheetTheme,
    InsertImage,
    AddEditor,
    AddViewer,
    GetAs,
    GetBlob,
}

impl SpreadsheetOp {
    /// The emulated host's method name for this operation.
    pub fn name(&self) -> &'static str {
        match self {
            SpreadsheetOp::Toast => "toast",
            SpreadsheetOp::AddMenu => "addMenu",
            SpreadsheetOp::RemoveMenu => "removeMenu",
            SpreadsheetOp::InsertSheet => "insertSheet",
            SpreadsheetOp::DeleteSheet => "deleteSheet",
            SpreadsheetOp::DuplicateActiveSheet => "duplicateActiveSheet",
            SpreadsheetOp::GetBandings => "getBandings",
            SpreadsheetOp::GetNamedRanges => "getNamedRanges",
            SpreadsheetOp::SetNamedRange => "setNamedRange",
            SpreadsheetOp::GetProtections => "getProtections",
            SpreadsheetOp::CreateTextFinder => "createTextFinder",
            SpreadsheetOp::SetSpreadsheetTheme => "setSpreadsheetTheme",
            SpreadsheetOp::InsertImage => "insertImage",
            SpreadsheetOp::AddEditor => "addEditor",
            SpreadsheetOp::AddViewer => "addViewer",
            SpreadsheetOp::GetAs => "getAs",
            SpreadsheetOp::GetBlob => "getBlob",
        }
    }
}

/// A resolved A1-style range reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeRef {
    /// Sheet title the range belongs to.
    pub sheet: String,
    /// The cell portion (e.g., "A1:B2").
    pub cells: String,
}

/// One sheet, viewed through its metadata.
#[derive(Debug, Clone)]
pub struct Sheet {
    meta: SheetMeta,
}

impl Sheet {
    /// Sheet identifier.
    pub fn sheet_id(&self) -> i64 {
        self.meta.properties.sheet_id
    }

    /// Sheet title.
    pub fn name(&self) -> &str {
        &self.meta.properties.title
    }

    /// Position within the spreadsheet.
    pub fn index(&self) -> u32 {
        self.meta.properties.index
    }

    /// Number of rows.
    pub fn rows(&self) -> u32 {
        self.meta.properties.grid_properties.row_count
    }

    /// Number of columns.
    pub fn columns(&self) -> u32 {
        self.meta.properties.grid_properties.column_count
    }
}

/// Structural pass-through over spreadsheet metadata.
#[derive(Debug, Clone)]
pub struct Spreadsheet {
    meta: SpreadsheetMeta,
}

impl Spreadsheet {
    /// Wrap already-fetched metadata.
    pub fn from_meta(meta: SpreadsheetMeta) -> Self {
        Self { meta }
    }

    /// Fetch metadata for a spreadsheet id through the bridge.
    pub fn open(session: &mut BridgeSession, spreadsheet_id: &str) -> Result<Self> {
        let reply = session.invoke(
            "sheets",
            "spreadsheets",
            "get",
            json!({ "spreadsheetId": spreadsheet_id }),
        )?;
        Ok(Self::from_meta(serde_json::from_value(reply.data)?))
    }

    /// The spreadsheet id.
    pub fn id(&self) -> &str {
        &self.meta.spreadsheet_id
    }

    /// The spreadsheet title.
    pub fn name(&self) -> &str {
        &self.meta.properties.title
    }

    /// The spreadsheet URL, when known.
    pub fn url(&self) -> Option<&str> {
        self.meta.spreadsheet_url.as_deref()
    }

    /// Number of contained sheets.
    pub fn num_sheets(&self) -> usize {
        self.meta.sheets.len()
    }

    /// All contained sheets.
    pub fn sheets(&self) -> Vec<Sheet> {
        self.meta
            .sheets
            .iter()
            .map(|meta| Sheet { meta: meta.clone() })
            .collect()
    }

    /// The sheet with the given id, if any.
    pub fn sheet_by_id(&self, sheet_id: i64) -> Option<Sheet> {
        self.sheets().into_iter().find(|s| s.sheet_id() == sheet_id)
    }

    /// The sheet with the given title, if any.
    pub fn sheet_by_name(&self, name: &str) -> Option<Sheet> {
        self.sheets().into_iter().find(|s| s.name() == name)
    }

    /// Resolve an A1-style range reference.
    ///
    /// "Sheet1!A1:B2" names a sheet explicitly; a bare "A1:B2" resolves
    /// against the first sheet.
    pub fn range(&self, a1: &str) -> Result<RangeRef> {
        let (sheet_name, cells) = match a1.split_once('!') {
            Some((sheet, cells)) => (Some(sheet), cells),
            None => (None, a1),
        };

        if cells.is_empty() {
            return Err(HostError::InvalidRange(a1.to_string()));
        }

        let sheet = match sheet_name {
            Some(name) => self
                .sheet_by_name(name)
                .ok_or_else(|| HostError::InvalidRange(a1.to_string()))?,
            None => self
                .sheets()
                .into_iter()
                .next()
                .ok_or_else(|| HostError::InvalidRange(a1.to_string()))?,
        };

        Ok(RangeRef {
            sheet: sheet.name().to_string(),
            cells: cells.to_string(),
        })
    }

    /// A recognised-but-unimplemented operation; always fails with the
    /// operation's name.
    pub fn op(&self, op: SpreadsheetOp) -> Result<serde_json::Value> {
        Err(HostError::NotYetImplemented {
            method: op.name().to_string(),
        })
    }
}
