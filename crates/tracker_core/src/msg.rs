#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User clicked "Scan page".
    ScanClicked,
    /// Dispatcher answered the scan request.
    ScanFinished(Result<crate::ExtractionResult, ScanFailure>),
    /// User edited one form field.
    FieldEdited(crate::DraftField),
    /// User submitted the form.
    SaveClicked,
    /// Store finished the append; the error carries the storage failure text.
    SaveFinished(Result<(), String>),
}

/// Why a scan produced no usable result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanFailure {
    /// The page answered, but the extractor reported an error.
    Extraction(String),
    /// No tab, or the page never answered.
    Unavailable(String),
}
