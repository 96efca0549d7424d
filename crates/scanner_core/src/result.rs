/// One crawled-site summary returned by the scan service.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScanResultEntry {
    pub base_url: String,
    pub pages_crawled: u64,
    pub pdf_count: u64,
    pub count_accessible: u64,
    pub count_likely: u64,
    pub count_inaccessible: u64,
    pub error_pages: Option<u64>,
    pub report_path: Option<String>,
}

/// Decoded body of a successful `/scan` reply.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScanResponse {
    pub results: Vec<ScanResultEntry>,
    pub status: Option<String>,
    pub zip_file: Option<String>,
}

impl ScanResponse {
    pub const STATUS_STOPPED: &'static str = "stopped";

    pub fn is_stopped(&self) -> bool {
        self.status.as_deref() == Some(Self::STATUS_STOPPED)
    }

    /// The archive link, treating an empty string as absent.
    pub fn download_link(&self) -> Option<&str> {
        self.zip_file.as_deref().filter(|link| !link.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultCategory {
    /// At least one PDF was found on the site.
    Ok,
    /// No PDFs were found; the card is highlighted.
    Attention,
}

impl ResultCategory {
    pub fn icon(self) -> &'static str {
        match self {
            ResultCategory::Ok => "📄",
            ResultCategory::Attention => "⚠️",
        }
    }
}

/// Per-entry classification. Does not look at other entries or the reply status.
pub fn classify(entry: &ScanResultEntry) -> ResultCategory {
    if entry.pdf_count == 0 {
        ResultCategory::Attention
    } else {
        ResultCategory::Ok
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardField {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultCard {
    pub title: String,
    pub category: ResultCategory,
    pub fields: Vec<CardField>,
}

pub fn render_card(entry: &ScanResultEntry) -> ResultCard {
    let mut fields = vec![
        field("Pages crawled", entry.pages_crawled),
        field("PDFs found", entry.pdf_count),
        field("Accessible", entry.count_accessible),
        field("Likely inaccessible", entry.count_likely),
        field("Inaccessible", entry.count_inaccessible),
    ];
    if let Some(error_pages) = entry.error_pages {
        fields.push(field("Error pages", error_pages));
    }
    if let Some(report_path) = &entry.report_path {
        fields.push(field("Report", report_path));
    }

    ResultCard {
        title: entry.base_url.clone(),
        category: classify(entry),
        fields,
    }
}

fn field(label: &'static str, value: impl ToString) -> CardField {
    CardField {
        label,
        value: value.to_string(),
    }
}
