use super::errors::{Result, TransformError};
use solvc_core::{Expr, ExprRef};

/// Turns a read path `base[i1][i2]...[in]` into the write that stores `value`
/// at the innermost index, rebuilding every enclosing level:
/// `base[i1 := base[i1][i2 := ... value]]`. The result is meant to be
/// assigned to `base`.
///
/// Anything other than a chain of selects is a caller bug and is reported as
/// [`TransformError::InternalConsistency`].
pub fn select_to_update(select: &ExprRef, value: ExprRef) -> Result<ExprRef> {
    match select.as_ref() {
        Expr::Select { base, index } => {
            let update = Expr::update(base.clone(), index.clone(), value);
            if base.is_select() {
                select_to_update(base, update)
            } else {
                Ok(update)
            }
        }
        other => Err(TransformError::InternalConsistency(format!(
            "expected a map or array select, found {:?}",
            other
        ))),
    }
}
