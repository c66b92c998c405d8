//! Route command handlers.

use tabled::Tabled;
use tracing::debug;

use routedeck_core::convert::route_from_json;
use routedeck_core::{HttpMethod, Route, RouteController, RouteListPage, RouteNode, RouteStatus};

use crate::cli::{MethodArg, OutputFormat, RouteFields, RoutesArgs, RoutesCommand};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct RouteRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "URIs")]
    uris: String,
    #[tabled(rename = "Methods")]
    methods: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Priority")]
    priority: i64,
}

impl RouteRow {
    fn new(node: &RouteNode, color: bool) -> Self {
        let r = &node.value;
        Self {
            id: r.id.clone().unwrap_or_else(|| node.key.clone()),
            name: r.name.clone().unwrap_or_default(),
            uris: r.uris.join(", "),
            methods: methods_label(r),
            status: output::status_text(&r.status.to_string(), r.status.is_enabled(), color),
            target: r.target().unwrap_or_else(|| output::dim("-", color)),
            priority: r.priority,
        }
    }
}

fn methods_label(r: &Route) -> String {
    if r.methods.is_empty() {
        "ANY".into()
    } else {
        r.methods.join(",")
    }
}

fn or_dash(values: &[String]) -> String {
    if values.is_empty() {
        "-".into()
    } else {
        values.join(", ")
    }
}

fn detail(r: &Route) -> String {
    let mut lines = vec![
        format!("ID:          {}", r.id.as_deref().unwrap_or("-")),
        format!("Name:        {}", r.name.as_deref().unwrap_or("-")),
        format!("Description: {}", r.desc.as_deref().unwrap_or("-")),
        format!("Status:      {}", r.status),
        format!("URIs:        {}", or_dash(&r.uris)),
        format!("Methods:     {}", methods_label(r)),
        format!("Hosts:       {}", or_dash(&r.hosts)),
        format!("Remote addr: {}", or_dash(&r.remote_addrs)),
        format!("Priority:    {}", r.priority),
        format!("WebSocket:   {}", r.enable_websocket),
        format!("Target:      {}", r.target().unwrap_or_else(|| "-".into())),
    ];
    if let Some(ts) = r.create_time {
        lines.push(format!("Created:     {}", ts.format("%Y-%m-%d %H:%M:%S UTC")));
    }
    if let Some(ts) = r.update_time {
        lines.push(format!("Updated:     {}", ts.format("%Y-%m-%d %H:%M:%S UTC")));
    }
    lines.join("\n")
}

fn route_id(r: &Route) -> String {
    r.id.clone().unwrap_or_default()
}

fn footer(page: &RouteListPage) -> String {
    format!(
        "Page {} of {} · total {}",
        page.page,
        page.total_pages(),
        page.total
    )
}

// ── Form flags → Route ──────────────────────────────────────────────

impl From<MethodArg> for HttpMethod {
    fn from(m: MethodArg) -> Self {
        match m {
            MethodArg::Get => Self::Get,
            MethodArg::Post => Self::Post,
            MethodArg::Put => Self::Put,
            MethodArg::Delete => Self::Delete,
            MethodArg::Patch => Self::Patch,
            MethodArg::Head => Self::Head,
            MethodArg::Options => Self::Options,
            MethodArg::Connect => Self::Connect,
            MethodArg::Trace => Self::Trace,
            MethodArg::Purge => Self::Purge,
        }
    }
}

fn text(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

/// Overlay the given flags on `route`. List flags replace the whole list.
fn apply_fields(route: &mut Route, fields: RouteFields) {
    if let Some(name) = fields.name {
        route.name = text(name);
    }
    if let Some(desc) = fields.desc {
        route.desc = text(desc);
    }
    if !fields.uris.is_empty() {
        route.uris = fields.uris;
    }
    if !fields.hosts.is_empty() {
        route.hosts = fields.hosts;
    }
    if !fields.remote_addrs.is_empty() {
        route.remote_addrs = fields.remote_addrs;
    }
    if !fields.methods.is_empty() {
        route.methods = fields
            .methods
            .into_iter()
            .map(|m| HttpMethod::from(m).as_str().to_owned())
            .collect();
    }
    if let Some(priority) = fields.priority {
        route.priority = priority;
    }
    if fields.disabled {
        route.status = RouteStatus::Disabled;
    } else if fields.enabled {
        route.status = RouteStatus::Enabled;
    }
    if let Some(id) = fields.upstream_id {
        route.upstream_id = text(id);
    }
    if let Some(id) = fields.service_id {
        route.service_id = text(id);
    }
    if let Some(id) = fields.plugin_config_id {
        route.plugin_config_id = text(id);
    }
    if fields.websocket {
        route.enable_websocket = true;
    } else if fields.no_websocket {
        route.enable_websocket = false;
    }
}

fn print_saved(ctx: &Context, saved: Option<&Route>, fallback_id: Option<&str>, verb: &str) {
    match saved {
        Some(route) if ctx.output != OutputFormat::Table => {
            let out = output::render_single(ctx.output, route, detail, route_id);
            output::print_output(&out, ctx.quiet);
        }
        Some(route) => {
            let id = route.id.as_deref().or(fallback_id).unwrap_or("-");
            output::print_output(&format!("Route {id} {verb}"), ctx.quiet);
        }
        None => {
            let id = fallback_id.unwrap_or("-");
            output::print_output(&format!("Route {id} {verb}"), ctx.quiet);
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &RouteController,
    args: RoutesArgs,
    ctx: &Context,
) -> Result<(), CliError> {
    match args.command {
        RoutesCommand::List { page, page_size } => {
            let page_size = page_size.unwrap_or(ctx.settings.page_size);
            let mut listing = util::with_spinner("Loading routes", ctx.quiet, async {
                controller.list(page, page_size).await
            })
            .await?;

            let last = listing.total_pages();
            if listing.total > 0 && listing.page > last {
                debug!(requested = listing.page, last, "page out of range, clamping");
                listing = controller.go_to_page(last).await?;
            }

            let out = output::render_list(
                ctx.output,
                &listing.items,
                &listing,
                |n| RouteRow::new(n, ctx.color),
                |n| n.value.id.clone().unwrap_or_else(|| n.key.clone()),
            );
            output::print_output(&out, ctx.quiet);
            if ctx.output == OutputFormat::Table {
                if listing.items.is_empty() {
                    output::print_output("No routes found", ctx.quiet);
                }
                output::print_output(&output::dim(&footer(&listing), ctx.color), ctx.quiet);
            }
            Ok(())
        }

        RoutesCommand::Get { id } => {
            let route = controller.get(&id).await?;
            let out = output::render_single(ctx.output, &route, detail, route_id);
            output::print_output(&out, ctx.quiet);
            Ok(())
        }

        RoutesCommand::Create {
            id,
            fields,
            from_file,
        } => {
            let mut route = match from_file {
                Some(ref path) => route_from_json(util::read_json_file(path)?)?,
                None => Route::default(),
            };
            if let Some(id) = id {
                route.id = text(id);
            }
            apply_fields(&mut route, fields);

            let saved = controller.create(&route).await?;
            print_saved(ctx, saved.as_ref(), route.id.as_deref(), "created");
            Ok(())
        }

        RoutesCommand::Update {
            id,
            fields,
            toggle_method,
            from_file,
        } => {
            let mut route = match from_file {
                Some(ref path) => route_from_json(util::read_json_file(path)?)?,
                None => controller.get(&id).await?,
            };
            route.id = Some(id.clone());
            apply_fields(&mut route, fields);
            for method in toggle_method {
                route.toggle_method(HttpMethod::from(method).as_str());
            }

            let saved = controller.update(&id, &route).await?;
            print_saved(ctx, saved.as_ref(), Some(&id), "updated");
            Ok(())
        }

        RoutesCommand::Delete { id } => {
            let target = controller.get(&id).await?;
            controller.request_delete(&id)?;
            let prompt = format!("Delete route '{}' ({id})?", target.display_name());
            let confirmed = match util::confirm(&prompt, ctx.yes, "delete") {
                Ok(answer) => answer,
                Err(e) => {
                    controller.cancel_delete()?;
                    return Err(e);
                }
            };
            if !confirmed {
                controller.cancel_delete()?;
                output::print_output("Cancelled", ctx.quiet);
                return Ok(());
            }

            controller.confirm_delete().await?;
            output::print_output(&format!("Route {id} deleted"), ctx.quiet);
            Ok(())
        }
    }
}
