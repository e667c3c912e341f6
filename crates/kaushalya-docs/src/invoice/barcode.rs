//! Code 128 bitmap for the order id.

use barcoders::sym::code128::Code128;
use image::{GrayImage, Luma};

const MODULE_PX: u32 = 2;
const HEIGHT_PX: u32 = 70;
const QUIET_MODULES: u32 = 10;

/// Renders `order_id` as a Code 128 (character set B) bitmap, black bars on
/// white with a quiet zone either side. Returns `None` when the id is empty
/// or cannot be encoded.
pub(crate) fn render(order_id: &str) -> Option<GrayImage> {
    let order_id = order_id.trim();
    if order_id.is_empty() {
        tracing::warn!("order has no id, omitting barcode");
        return None;
    }
    let modules = match Code128::new(format!("\u{181}{order_id}")) {
        Ok(symbol) => symbol.encode(),
        Err(e) => {
            tracing::warn!(order_id, error = %e, "order id cannot be encoded as Code 128, omitting barcode");
            return None;
        }
    };

    let count = u32::try_from(modules.len()).ok()?;
    let width = (count + 2 * QUIET_MODULES) * MODULE_PX;
    let mut bitmap = GrayImage::from_pixel(width, HEIGHT_PX, Luma([255]));
    for (module, bit) in (0u32..).zip(&modules) {
        if *bit == 0 {
            continue;
        }
        let left = (QUIET_MODULES + module) * MODULE_PX;
        for x in left..left + MODULE_PX {
            for y in 0..HEIGHT_PX {
                bitmap.put_pixel(x, y, Luma([0]));
            }
        }
    }
    Some(bitmap)
}
