pub mod error;
pub mod servant;

pub use error::{ClassifyError, ClassifyResult};
pub use servant::{
    MatchConfig, PipelinePaths, Region, RegionExtractor, Servant, ServantClass, ServantClassifier,
    ServantReport, Template, TemplateMatcher, TemplateSet,
};
