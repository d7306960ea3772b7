// ============================================================
// Layer 2 — Application / Pipeline Stages
// ============================================================
// Each stage coordinates the other layers for one pipeline step
// and owns its config and collaborators for a single run:
//
//   construct → initiate() once → discard
//
// Rules for this layer:
//   - No Burn code here (that's Layer 5)
//   - No printing here (that's Layer 1)
//   - Only workflow coordination, logging, and error wrapping

// Evaluate the trained model against the promoted one
pub mod evaluate_use_case;

// Upload an accepted model
pub mod push_use_case;

#[cfg(test)]
pub(crate) mod test_support;
