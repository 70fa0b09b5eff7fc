//! Advisory checks run over the session cart before every handler.
//! Nothing here blocks a request; problems are only written onto the cart.

use crate::cart::Cart;
use crate::session::SessionData;

pub const WAIVER_WARNING: &str = "One or more of your selected tours requires a waiver";
pub const GUEST_COUNT_ERROR: &str =
    "One or more of your selected tours exceeds the maximum number of guests that can be accommodated";

/// Flags the cart when any line needs a signed waiver.
pub fn check_waivers(cart: &mut Cart) {
    cart.warnings.retain(|w| w != WAIVER_WARNING);
    if cart.items.iter().any(|item| item.product.requires_waiver) {
        cart.warnings.push(WAIVER_WARNING.to_string());
    }
}

/// Flags the cart when any line has more guests than its vacation allows.
pub fn check_guest_counts(cart: &mut Cart) {
    cart.errors.retain(|e| e != GUEST_COUNT_ERROR);
    if cart.items.iter().any(|item| item.guests > item.product.maximum_guests) {
        cart.errors.push(GUEST_COUNT_ERROR.to_string());
    }
}

/// Recomputes the cart annotations. A visitor without a cart is left alone.
pub fn validate_cart(session: &mut SessionData) {
    let Some(cart) = session.cart.as_mut() else {
        return;
    };
    cart.warnings.clear();
    cart.errors.clear();
    check_waivers(cart);
    check_guest_counts(cart);
}
