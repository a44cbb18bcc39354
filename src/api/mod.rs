pub mod dto;
pub mod messages;

pub use dto::{
    CompositionEntry, DeleteMixParams, DeletedCount, FindSimilarColorsParams, ListMixesParams,
    MediumParams, MixPaintsParams, MixSort, SaveMixParams, SetBackgroundParams,
    SimilarColorDto, SimilarColorSort,
};
pub use messages::{ErrorBody, Request, Response};
