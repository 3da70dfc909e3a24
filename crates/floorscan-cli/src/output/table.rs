use floorscan_core::model::{
    FloorPlanAnalysis, Line, PageScale, RoomLabelResult, ScaleAnnotation, TextFragment,
};

pub fn print_analysis(analysis: &FloorPlanAnalysis) {
    println!("=== Lines ===\n");
    print_lines(&analysis.lines);

    println!("=== Scale ===\n");
    print_scale(&analysis.scale);

    println!("=== Rooms ===\n");
    print_rooms(&analysis.rooms);
}

pub fn print_lines(lines: &[Line]) {
    if lines.is_empty() {
        println!("  (no text)\n");
        return;
    }

    for (i, line) in lines.iter().enumerate() {
        let phrases: Vec<String> = line
            .phrases
            .iter()
            .map(|p| format!("{} [{}]", p.text, p.item_count))
            .collect();
        println!("  {:>3}  {}", i + 1, phrases.join("  |  "));
    }
    println!();
}

pub fn print_groups(groups: &[Vec<TextFragment>]) {
    if groups.is_empty() {
        println!("  (no text)\n");
        return;
    }

    for (i, group) in groups.iter().enumerate() {
        let texts: Vec<&str> = group.iter().map(|f| f.text.as_str()).collect();
        println!("  {:>3}  {}", i + 1, texts.join(" "));
    }
    println!();
}

pub fn print_scale(scale: &ScaleAnnotation) {
    match scale.usable_ratio() {
        Some(ratio) => {
            let units = scale
                .units
                .map(|u| format!(" ({u})"))
                .unwrap_or_default();
            println!("  Ratio: {ratio}{units}");
            println!("  Found: {}", scale.raw_text);
            if let Some(source) = scale.source {
                println!("  Via:   {source}");
            }
        }
        None => println!("  Not to scale"),
    }
    println!();
}

pub fn print_rooms(rooms: &[RoomLabelResult]) {
    if rooms.is_empty() {
        println!("  (no labels)\n");
        return;
    }

    let max_label = rooms.iter().map(|r| r.label.len()).max().unwrap_or(10);

    for room in rooms {
        let placement = if room.is_matched() {
            format!("{} vertices", room.polygon.points.len())
        } else {
            "no room".to_string()
        };
        let size = match room.real_size {
            Some(size) => format!("{:.2} x {:.2}", size.width, size.height),
            None => "-".to_string(),
        };
        println!(
            "  {:<width$}  {:<12}  {}",
            room.label,
            placement,
            size,
            width = max_label
        );
    }
    println!();
}

pub fn print_page_scales(pages: &[PageScale]) {
    if pages.is_empty() {
        println!("  (no pages)");
        return;
    }

    for page in pages {
        let scale = match &page.scale {
            Some(info) => match (info.ratio, info.units) {
                (Some(ratio), Some(units)) => format!("{ratio} ({units})"),
                (Some(ratio), None) => ratio.to_string(),
                (None, _) => "?".to_string(),
            },
            None => "not to scale".to_string(),
        };
        println!("  Page {:>3}  {}", page.page, scale);
    }
}
