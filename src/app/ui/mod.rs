mod details;
mod panels;

pub(in crate::app) use details::tooltip_text;
