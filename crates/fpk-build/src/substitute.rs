use fpk_core::Variables;

pub const SERVICE_NAME_PLACEHOLDER: &str = "${SERVICE_NAME}";
pub const CONTAINER_NAME_PLACEHOLDER: &str = "${CONTAINER_NAME}";
pub const FIRST_PORT_PLACEHOLDER: &str = "${FIRST_PORT}";

/// Replaces the `${SERVICE_NAME}`, `${CONTAINER_NAME}` and `${FIRST_PORT}`
/// placeholders with their values. Matching is literal; any other `${...}`
/// text is left as is.
pub fn replace_variables(content: &str, vars: &Variables) -> String {
    let replacements = [
        (SERVICE_NAME_PLACEHOLDER, vars.service_name.as_str()),
        (CONTAINER_NAME_PLACEHOLDER, vars.container_name.as_str()),
        (FIRST_PORT_PLACEHOLDER, vars.first_port.as_str()),
    ];

    replacements
        .iter()
        .fold(content.to_owned(), |text, (placeholder, value)| {
            text.replace(placeholder, value)
        })
}
