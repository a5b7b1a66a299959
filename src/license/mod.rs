/// License normalization: canonical short-identifier resolution and SPDX
/// expression building.
pub mod expression;
pub mod ids;
pub mod short_identifier;

pub use expression::{
    license_expression, license_ref_id, LicenseExpression, LicenseOutcome, LICENSE_REF_PREFIX,
    NO_ASSERTION,
};
pub use ids::SPDX_LICENSE_IDS;
pub use short_identifier::short_identifier;
