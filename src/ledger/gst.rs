/// Fixed GST rate applied to purchase base amounts.
pub const GST_RATE: f64 = 0.05;

/// Tax split for a purchase base amount.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GstBreakdown {
    /// 5% of the base amount, or zero when GST does not apply.
    pub gst_amount: f64,
    /// Final payable amount. Whole-rupee rounded when GST applies,
    /// untouched otherwise.
    pub total: f64,
}

/// Splits a base amount into tax and payable total.
///
/// Rounding applies to the GST-inclusive total, not the tax itself, half
/// up to the nearest whole rupee. Callers validate `base_amount > 0`
/// before reaching this function.
pub fn compute_gst(base_amount: f64, apply_gst: bool) -> GstBreakdown {
    if !apply_gst {
        return GstBreakdown {
            gst_amount: 0.0,
            total: base_amount,
        };
    }
    let gst_amount = base_amount * GST_RATE;
    GstBreakdown {
        gst_amount,
        total: (base_amount + gst_amount).round(),
    }
}
