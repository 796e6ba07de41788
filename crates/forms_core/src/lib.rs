//! # forms_core: Page Model and Pricing Form Controllers
//!
//! ## Role
//!
//! forms_core holds everything between the page a user fills in and the
//! remote pricing service:
//! - Page element model addressed by stable ids (`page`)
//! - The surface trait controllers talk through, and the placeholder
//!   fallback helper (`surface`)
//! - Radio group selection (`selection`)
//! - Request and response shapes of the two pricing endpoints (`wire`)
//! - The pricing service seam (`service`)
//! - Option and bond form controllers (`option_form`, `bond_form`)
//! - Reply dispatch back onto the event loop (`dispatch`)
//!
//! The pricing math itself is not here: prices, Greeks and coupon schedules
//! are computed server-side and only rendered by this crate.
//!
//! ## Usage Examples
//!
//! ```rust
//! use forms_core::option_form::{option_pricing_page, OptionPricingController};
//! use forms_core::selection::MissingSelectionPolicy;
//! use forms_core::wire::CallPut;
//!
//! let mut page = option_pricing_page();
//! page.check("put").unwrap();
//! page.set_value("strikePrice", "105").unwrap();
//!
//! let controller = OptionPricingController::new(MissingSelectionPolicy::Submit);
//! let request = controller.prepare(&mut page).unwrap().unwrap();
//! assert_eq!(request.strike_price, "105");
//! assert_eq!(request.call_put, Some(CallPut::Put));
//! assert!(page.pending_alerts().is_empty());
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod bond_form;
pub mod dispatch;
pub mod error;
pub mod option_form;
pub mod page;
pub mod selection;
pub mod service;
pub mod surface;
pub mod wire;

pub use error::FormError;
pub use service::{PricingService, ServiceError};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::bond_form::{bond_pricing_page, BondPricingController};
    pub use crate::dispatch::{Dispatcher, Reply};
    pub use crate::error::FormError;
    pub use crate::option_form::{option_pricing_page, OptionPricingController};
    pub use crate::page::Page;
    pub use crate::selection::MissingSelectionPolicy;
    pub use crate::service::{PricingService, ServiceError};
    pub use crate::surface::{read_field, value_or_placeholder, FormSurface};
}
