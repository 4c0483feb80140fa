use fpk_core::Variables;

/// Lifecycle hooks written next to `cmd/main`, in write order.
pub const LIFECYCLE_HOOKS: &[&str] = &[
    "install_init",
    "install_callback",
    "uninstall_init",
    "uninstall_callback",
    "upgrade_init",
    "upgrade_callback",
    "config_init",
    "config_callback",
];

/// Default `cmd/main`.
///
/// The docker project itself is started and stopped by the platform, so
/// `start`/`stop` only log. `status` reports whether the container is
/// running (exit 0) or not (exit 3).
pub fn render_main_script(vars: &Variables) -> String {
    format!(
        r#"#!/bin/bash

SERVICE_NAME="{service}"
CONTAINER_NAME="{container}"
LOG_FILE="${{TRIM_PKGVAR:-/tmp}}/info.log"

log_msg() {{
    echo "$(date '+%Y-%m-%d %H:%M:%S') [$SERVICE_NAME] $1" >> "$LOG_FILE"
}}

case "$1" in
start)
    log_msg "start requested"
    exit 0
    ;;
stop)
    log_msg "stop requested"
    exit 0
    ;;
status)
    if docker ps --filter "name=^${{CONTAINER_NAME}}$" --filter "status=running" --quiet | grep -q .; then
        exit 0
    fi
    exit 3
    ;;
*)
    exit 1
    ;;
esac
"#,
        service = vars.service_name,
        container = vars.container_name,
    )
}

/// Default lifecycle hook: logs the hook name and succeeds.
pub fn render_lifecycle_script(hook: &str, vars: &Variables) -> String {
    format!(
        r#"#!/bin/bash

# {hook} hook for {service}
echo "$(date '+%Y-%m-%d %H:%M:%S') [{service}] {hook}" >> "${{TRIM_PKGVAR:-/tmp}}/info.log"

exit 0
"#,
        service = vars.service_name,
    )
}
