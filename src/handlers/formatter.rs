use serde_json::Value;

use crate::models::{
    AnalysisResult, DescribeUpdateAck, DescribeUpdateBody, LabelPatchAck, LabelPatchBody,
};

/// What part of the backend result an endpoint returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    Full,
    Field(&'static str),
}

pub fn format_result(result: AnalysisResult, shape: ResponseShape) -> Value {
    match shape {
        ResponseShape::Full => result,
        ResponseShape::Field(name) => match result {
            Value::Object(mut map) => map.remove(name).unwrap_or(Value::Null),
            _ => Value::Null,
        },
    }
}

pub fn describe_update_ack(update: DescribeUpdateBody) -> DescribeUpdateAck {
    DescribeUpdateAck {
        message: "📝 Description label updated (mock).".to_string(),
        image_url: update.image_url,
        updated_label: update.new_label,
    }
}

pub fn label_patch_ack(patch: LabelPatchBody) -> LabelPatchAck {
    LabelPatchAck {
        message: "🔧 Label patched successfully (mock).".to_string(),
        image_url: patch.image_url,
        patched_label: patch.label_patch,
    }
}
