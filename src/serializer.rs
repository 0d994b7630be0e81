//! Serializer for converting a goal assignment back to goal notation.

use crate::assignment::GoalAssignment;

/// Serialize an assignment to goal notation.
pub fn serialize(assignment: &GoalAssignment) -> String {
    let mut output = String::new();

    output.push_str(&format!("high {}\n", quote(&assignment.high_goal)));

    // Pool first so every mid block reference resolves when parsed back.
    // Assigned goals missing from the pool are declared too.
    let mut pool: Vec<&str> = assignment.low_goals.iter().map(String::as_str).collect();
    for low in assignment.assigned_low_goals() {
        if !pool.contains(&low) {
            pool.push(low);
        }
    }
    if !pool.is_empty() {
        output.push('\n');
        for low in &pool {
            output.push_str(&format!("low {}\n", quote(low)));
        }
    }

    if !assignment.mid_goals.is_empty() {
        output.push('\n');
        for (i, mid) in assignment.mid_goals.iter().enumerate() {
            serialize_mid(&mut output, mid, assignment.low_goals_for(i));
        }
    }

    output
}

fn serialize_mid(output: &mut String, mid: &str, lows: &[String]) {
    output.push_str(&format!("mid {}", quote(mid)));

    if !lows.is_empty() {
        output.push_str(" {\n");
        for low in lows {
            output.push_str(&format!("    {},\n", quote(low)));
        }
        output.push('}');
    }

    output.push('\n');
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}
