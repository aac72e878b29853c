//! HTML to snapshot extraction.
//!
//! The upstream tracker serves a loosely-structured page per stop: one
//! `.directionAtStop` section per route+direction pair, each containing a
//! header line and zero or more ordered lists of arrivals. [`extract`] maps
//! that markup to a [`StopSnapshot`]. It never fails: missing or malformed
//! pieces degrade to empty strings and sentinel ranks rather than aborting
//! the whole extraction.

mod text;

pub use text::{distance_text, minutes_rank, normalize_distance};

use scraper::{ElementRef, Html, Selector};

use crate::domain::{ArrivalEstimate, RouteArrivals, StopSnapshot};

/// Pre-parsed selectors for the upstream markup shape.
struct Selectors {
    route_block: Selector,
    heading: Selector,
    stop_header: Selector,
    list: Selector,
    item: Selector,
    emphasis: Selector,
    small: Selector,
}

impl Selectors {
    fn new() -> Option<Self> {
        Some(Self {
            route_block: Selector::parse(".directionAtStop").ok()?,
            heading: Selector::parse("h1, h2, h3, h4, h5, h6").ok()?,
            stop_header: Selector::parse(".stopHeader").ok()?,
            list: Selector::parse("ol").ok()?,
            item: Selector::parse("li").ok()?,
            emphasis: Selector::parse("strong, em").ok()?,
            small: Selector::parse("small").ok()?,
        })
    }
}

/// Extract a stop snapshot from the upstream tracker page.
///
/// Pure and total: no I/O, and any input (including non-HTML garbage)
/// yields a snapshot, possibly with no routes.
pub fn extract(html: &str) -> StopSnapshot {
    let Some(selectors) = Selectors::new() else {
        return StopSnapshot::default();
    };

    let doc = Html::parse_document(html);

    let routes = doc
        .select(&selectors.route_block)
        .filter_map(|block| parse_route_block(block, &selectors))
        .collect();

    StopSnapshot {
        stop_name: stop_name(&doc, &selectors),
        routes,
    }
}

/// Parse one route section. Returns `None` when the section has no header
/// or the header has no route token; such blocks are skipped entirely.
fn parse_route_block(block: ElementRef, selectors: &Selectors) -> Option<RouteArrivals> {
    let header = block
        .select(&selectors.heading)
        .next()
        .or_else(|| block.select(&selectors.stop_header).next())
        .map(element_text)?;

    let header = header.trim();
    let mut parts = header.splitn(2, char::is_whitespace);
    let route_id = parts.next().filter(|token| !token.is_empty())?;
    let direction = parts.next().map(str::trim).unwrap_or("");

    // A section with a header but no lists is a route with no buses en
    // route; it is still emitted with empty arrivals.
    let arrivals = block
        .select(&selectors.list)
        .filter_map(|list| parse_arrival(list, selectors))
        .collect();

    Some(RouteArrivals {
        route_id: route_id.to_string(),
        direction: direction.to_string(),
        arrivals,
    })
}

/// Parse one ordered list into at most one arrival.
///
/// Only the first list item is read: in the upstream markup each list
/// carries a single arrival. A list with no items yields no arrival.
fn parse_arrival(list: ElementRef, selectors: &Selectors) -> Option<ArrivalEstimate> {
    let item = list.select(&selectors.item).next()?;

    let display_text = item
        .select(&selectors.emphasis)
        .next()
        .map(element_text)
        .unwrap_or_default();

    let vehicle_id = item
        .select(&selectors.small)
        .next()
        .map(|el| {
            let text = element_text(el);
            text.strip_prefix("Vehicle ").unwrap_or(&text).to_string()
        })
        .unwrap_or_default();

    let distance_label = normalize_distance(&distance_text(&element_text(item)));

    Some(ArrivalEstimate {
        minutes_rank: minutes_rank(&display_text),
        display_text,
        distance_label,
        vehicle_id,
    })
}

/// Find the stop name on a stop-detail page.
///
/// The page carries a heading containing "Bus Stop:"; the stop name is the
/// first non-empty text among that heading's subsequent siblings. Empty
/// string when the heading or the sibling text is absent.
fn stop_name(doc: &Html, selectors: &Selectors) -> String {
    let Some(heading) = doc
        .select(&selectors.heading)
        .find(|h| element_text(*h).contains("Bus Stop:"))
    else {
        return String::new();
    };

    for sibling in heading.next_siblings() {
        let text = match ElementRef::wrap(sibling) {
            Some(el) => element_text(el),
            None => sibling
                .value()
                .as_text()
                .map(|t| t.trim().to_string())
                .unwrap_or_default(),
        };
        if !text.is_empty() {
            return text;
        }
    }

    String::new()
}

/// Concatenated, trimmed text content of an element.
fn element_text(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UNRANKED;

    #[test]
    fn end_to_end_sample_document() {
        let html = r#"
            <div class="directionAtStop">
                <h3>M101 Southbound</h3>
                <ol>
                    <li><strong>3 min</strong>, 3 minutes, 2 stops away, <small>Vehicle 1234</small></li>
                </ol>
            </div>
        "#;

        let snapshot = extract(html);
        assert_eq!(snapshot.routes.len(), 1);

        let route = &snapshot.routes[0];
        assert_eq!(route.route_id, "M101");
        assert_eq!(route.direction, "Southbound");
        assert_eq!(route.arrivals.len(), 1);

        let arrival = &route.arrivals[0];
        assert_eq!(arrival.display_text, "3 min");
        assert_eq!(arrival.minutes_rank, 3.0);
        assert_eq!(arrival.distance_label, "2 stops away");
        assert_eq!(arrival.vehicle_id, "1234");
    }

    #[test]
    fn header_without_direction_still_included() {
        let html = r#"<div class="directionAtStop"><h3>B62</h3></div>"#;

        let snapshot = extract(html);
        assert_eq!(snapshot.routes.len(), 1);
        assert_eq!(snapshot.routes[0].route_id, "B62");
        assert_eq!(snapshot.routes[0].direction, "");
    }

    #[test]
    fn block_without_header_skipped() {
        let html = r#"
            <div class="directionAtStop"><ol><li><strong>2 min</strong></li></ol></div>
            <div class="directionAtStop"><h3>B43 Northbound</h3></div>
        "#;

        let snapshot = extract(html);
        assert_eq!(snapshot.routes.len(), 1);
        assert_eq!(snapshot.routes[0].route_id, "B43");
    }

    #[test]
    fn block_with_blank_header_skipped() {
        let html = r#"<div class="directionAtStop"><h3>   </h3></div>"#;

        let snapshot = extract(html);
        assert!(snapshot.routes.is_empty());
    }

    #[test]
    fn stop_header_class_used_when_no_heading() {
        let html = r#"
            <div class="directionAtStop">
                <p class="stopHeader">B48 Lefferts Gardens</p>
            </div>
        "#;

        let snapshot = extract(html);
        assert_eq!(snapshot.routes.len(), 1);
        assert_eq!(snapshot.routes[0].route_id, "B48");
        assert_eq!(snapshot.routes[0].direction, "Lefferts Gardens");
    }

    #[test]
    fn route_with_no_lists_has_empty_arrivals() {
        let html = r#"<div class="directionAtStop"><h3>B24 Greenpoint</h3></div>"#;

        let snapshot = extract(html);
        assert_eq!(snapshot.routes.len(), 1);
        assert!(snapshot.routes[0].arrivals.is_empty());
    }

    #[test]
    fn list_with_no_items_yields_no_arrival() {
        let html = r#"<div class="directionAtStop"><h3>B24 Greenpoint</h3><ol></ol></div>"#;

        let snapshot = extract(html);
        assert_eq!(snapshot.routes.len(), 1);
        assert!(snapshot.routes[0].arrivals.is_empty());
    }

    #[test]
    fn only_first_item_of_each_list_is_read() {
        let html = r#"
            <div class="directionAtStop">
                <h3>B62 Queens Plaza</h3>
                <ol>
                    <li><strong>2 min</strong>, 2 minutes, 1 stop away</li>
                    <li><strong>9 min</strong>, 9 minutes, 18 stops away</li>
                </ol>
                <ol>
                    <li><strong>15 min</strong>, 15 minutes, 1.2 miles away</li>
                </ol>
            </div>
        "#;

        let snapshot = extract(html);
        let route = &snapshot.routes[0];
        assert_eq!(route.arrivals.len(), 2);
        assert_eq!(route.arrivals[0].display_text, "2 min");
        assert_eq!(route.arrivals[0].distance_label, "1 stops away");
        assert_eq!(route.arrivals[1].display_text, "15 min");
        // round(1.2 * 8) = 10
        assert_eq!(route.arrivals[1].distance_label, "~10 stops away");
    }

    #[test]
    fn missing_fields_degrade_to_defaults() {
        let html = r#"
            <div class="directionAtStop">
                <h3>B32 Williamsburg</h3>
                <ol><li>no structured content here</li></ol>
            </div>
        "#;

        let snapshot = extract(html);
        let arrival = &snapshot.routes[0].arrivals[0];
        assert_eq!(arrival.display_text, "");
        assert_eq!(arrival.minutes_rank, UNRANKED);
        assert_eq!(arrival.distance_label, "");
        assert_eq!(arrival.vehicle_id, "");
    }

    #[test]
    fn vehicle_prefix_stripped() {
        let html = r#"
            <div class="directionAtStop">
                <h3>B62 Queens Plaza</h3>
                <ol><li><strong>4 min</strong>, 4 minutes, 3 stops away, <small>Vehicle 7421</small></li></ol>
            </div>
        "#;

        let snapshot = extract(html);
        assert_eq!(snapshot.routes[0].arrivals[0].vehicle_id, "7421");
    }

    #[test]
    fn vehicle_without_prefix_kept_verbatim() {
        let html = r#"
            <div class="directionAtStop">
                <h3>B62 Queens Plaza</h3>
                <ol><li><strong>4 min</strong><small>7421</small></li></ol>
            </div>
        "#;

        let snapshot = extract(html);
        assert_eq!(snapshot.routes[0].arrivals[0].vehicle_id, "7421");
    }

    #[test]
    fn approaching_arrival_ranks_first() {
        let html = r#"
            <div class="directionAtStop">
                <h3>B43 Northbound</h3>
                <ol><li><em>Approaching</em>, 1 minute, approaching, <small>Vehicle 88</small></li></ol>
            </div>
        "#;

        let snapshot = extract(html);
        let arrival = &snapshot.routes[0].arrivals[0];
        assert_eq!(arrival.display_text, "Approaching");
        assert_eq!(arrival.minutes_rank, 0.0);
        assert_eq!(arrival.distance_label, "Approaching");
    }

    #[test]
    fn stop_name_from_heading_sibling_text() {
        let html = r#"
            <h2>Bus Stop:</h2>
            GRAHAM AV/METROPOLITAN AV
            <div class="directionAtStop"><h3>B43 Northbound</h3></div>
        "#;

        let snapshot = extract(html);
        assert_eq!(snapshot.stop_name, "GRAHAM AV/METROPOLITAN AV");
    }

    #[test]
    fn stop_name_from_heading_sibling_element() {
        let html = r#"
            <h2>Bus Stop: 308209</h2>
            <p></p>
            <p>MANHATTAN AV/NORMAN AV</p>
        "#;

        let snapshot = extract(html);
        assert_eq!(snapshot.stop_name, "MANHATTAN AV/NORMAN AV");
    }

    #[test]
    fn stop_name_empty_when_heading_absent() {
        let html = r#"<h2>Somewhere else</h2><p>Not a stop page</p>"#;

        assert_eq!(extract(html).stop_name, "");
    }

    #[test]
    fn routes_keep_document_order() {
        let html = r#"
            <div class="directionAtStop"><h3>B62 Queens Plaza</h3></div>
            <div class="directionAtStop"><h3>B24 Greenpoint</h3></div>
            <div class="directionAtStop"><h3>B43 Northbound</h3></div>
        "#;

        let snapshot = extract(html);
        let ids: Vec<&str> = snapshot.routes.iter().map(|r| r.route_id.as_str()).collect();
        assert_eq!(ids, vec!["B62", "B24", "B43"]);
    }

    #[test]
    fn garbage_input_yields_empty_snapshot() {
        let snapshot = extract("}{ not <html <<< at all");
        assert_eq!(snapshot, StopSnapshot::default());
    }

    #[test]
    fn empty_input_yields_empty_snapshot() {
        assert_eq!(extract(""), StopSnapshot::default());
    }

    mod proptests {
        use proptest::prelude::*;

        use super::super::extract;

        proptest! {
            // extract must never panic, whatever the input looks like.
            #[test]
            fn extract_total(html in ".*") {
                let _ = extract(&html);
            }
        }
    }
}
