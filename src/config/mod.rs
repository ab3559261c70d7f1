pub mod checks;
pub mod params;
pub mod schema;

pub use checks::Check;
pub use params::{ParamDef, Params};
pub use schema::{
    ArtifactConfig, BrowserConfig, Condition, ExpectCondition, TargetUrl, VerifyConfig,
};
