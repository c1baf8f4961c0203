pub mod builder;
pub mod document;
pub mod reveal;
pub mod session;
pub mod summary;
pub mod templates;

pub use builder::SessionBuilder;
pub use document::{read_document, DocumentContext, DocumentError, DocumentExtractor, PdfExtractor};
pub use reveal::{RevealFrame, RevealFrames, RevealHandle, Segment, TextRevealAnimator};
pub use session::{
    ChatSession, PendingReply, Reply, ReplyOutcome, RequestId, StopOutcome, SubmissionState,
    SubmitOutcome, UploadOutcome,
};
pub use summary::{SummaryBatchFetcher, SummaryWatcher};
