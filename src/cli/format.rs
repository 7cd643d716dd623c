//! Format output dispatch helpers

/// Dispatch output by format, wrapping the human and csv branches in `Ok`.
///
/// The json branch is an expression returning `Result`; human and csv are
/// blocks that may use `?` against the enclosing function.
///
/// # Examples
///
/// ```rust,ignore
/// output_by_format_result!(cli.format,
///     json => { print_json()?; Ok::<(), MigsizeError>(()) },
///     human => { print_table(); },
///     csv => { print_csv(); }
/// )?;
/// ```
#[macro_export]
macro_rules! output_by_format_result {
    ($format:expr, json => $json:expr, human => $human:block, csv => $csv:block) => {
        match $format {
            $crate::cli::OutputFormat::Json => $json,
            $crate::cli::OutputFormat::Human => {
                $human;
                Ok(())
            }
            $crate::cli::OutputFormat::Csv => {
                $csv;
                Ok(())
            }
        }
    };
}
