pub mod candidate_grouper;
mod disjoint_set;
pub mod model_resolver;
pub mod onnx_blazeface_detector;
