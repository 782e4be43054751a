// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The trivial passthrough converter.

use super::Converter;
use crate::error::LpsError;
use std::io::Write;

/// `un`: relay input to output unchanged.
pub struct UnConverter;

impl Converter for UnConverter {
    fn name(&self) -> &'static str {
        "un"
    }

    fn convert(
        &self,
        input: &str,
        _args: &[String],
        out: &mut dyn Write,
    ) -> Result<(), LpsError> {
        out.write_all(input.as_bytes())
            .map_err(|e| LpsError::ConverterFailed(e.to_string()))
    }
}
