//! Record commands: `list`, `show`, `stats` and `edit`.

use crate::cli::context::CommandContext;
use crate::cli::output::{
    format_path_check, format_time, or_dash, outln, print_fields, print_json, print_table,
    truncate,
};
use filedock::catalog::{QueryService, RecordEdit, RecordEditor};
use filedock_db::{FileRecord, RecordFilter};

const PROMPT_WIDTH: usize = 40;

#[derive(Debug)]
pub struct ListArgs {
    pub filter: RecordFilter,
    pub json: bool,
}

pub async fn run_list(ctx: &CommandContext, args: ListArgs) -> anyhow::Result<()> {
    let db = ctx.open_db().await?;
    let records = QueryService::new(&db).list(&args.filter).await?;

    if args.json {
        return print_json(&records);
    }

    if records.is_empty() {
        outln!("No records match.");
        return Ok(());
    }

    let rows = records
        .iter()
        .map(|summary| {
            let record = &summary.record;
            vec![
                record.id.to_string(),
                record.file_name.clone(),
                or_dash(record.name.as_deref()),
                or_dash(record.class.as_deref()),
                truncate(&or_dash(record.prompt.as_deref()), PROMPT_WIDTH),
                format_path_check(record.path_check).to_string(),
                if record.is_converted() { "yes" } else { "no" }.to_string(),
                summary.image_count.to_string(),
            ]
        })
        .collect();
    print_table(
        &["ID", "File", "Name", "Class", "Prompt", "On disk", "Converted", "Images"],
        rows,
    );
    outln!("{} record(s)", records.len());
    Ok(())
}

#[derive(Debug)]
pub struct ShowArgs {
    pub id: i64,
    pub json: bool,
}

pub async fn run_show(ctx: &CommandContext, args: ShowArgs) -> anyhow::Result<()> {
    let db = ctx.open_db().await?;
    let detail = QueryService::new(&db).get(args.id).await?;

    if args.json {
        return print_json(&detail);
    }

    print_record(&detail.record);
    if detail.images.is_empty() {
        outln!("No images attached.");
    } else {
        let images_dir = ctx.config.images();
        let rows = detail
            .images
            .iter()
            .map(|image| {
                vec![
                    image.id.to_string(),
                    image.sort_order.to_string(),
                    images_dir.join(&image.image_path).display().to_string(),
                    format_time(image.created_at),
                ]
            })
            .collect();
        print_table(&["Image ID", "Order", "Path", "Attached"], rows);
    }
    Ok(())
}

#[derive(Debug)]
pub struct StatsArgs {
    pub json: bool,
}

pub async fn run_stats(ctx: &CommandContext, args: StatsArgs) -> anyhow::Result<()> {
    let db = ctx.open_db().await?;
    let stats = QueryService::new(&db).stats().await?;

    if args.json {
        return print_json(&stats);
    }

    print_fields(vec![
        ("Records", stats.total.to_string()),
        ("Missing on disk", stats.missing.to_string()),
        ("Not yet checked", stats.unchecked.to_string()),
        ("Converted", stats.converted.to_string()),
        ("Images", stats.images.to_string()),
    ]);
    Ok(())
}

#[derive(Debug)]
pub struct EditArgs {
    pub id: i64,
    pub edit: RecordEdit,
    pub json: bool,
}

pub async fn run_edit(ctx: &CommandContext, args: EditArgs) -> anyhow::Result<()> {
    let db = ctx.open_db().await?;
    let record = RecordEditor::new(&db).edit(args.id, &args.edit).await?;

    if args.json {
        return print_json(&record);
    }

    outln!("Updated record {}", record.id);
    print_record(&record);
    Ok(())
}

fn print_record(record: &FileRecord) {
    print_fields(vec![
        ("ID", record.id.to_string()),
        ("Origin", record.origin_path.clone()),
        ("File", record.file_name.clone()),
        ("Name", or_dash(record.name.as_deref())),
        ("Class", or_dash(record.class.as_deref())),
        ("Prompt", or_dash(record.prompt.as_deref())),
        ("Target", or_dash(record.target_path.as_deref())),
        ("On disk", format_path_check(record.path_check).to_string()),
        ("Created", format_time(record.created_at)),
        ("Updated", format_time(record.updated_at)),
    ]);
}
