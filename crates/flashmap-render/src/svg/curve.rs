use super::util::fmt_path_into;
use crate::model::LayoutPoint;

fn emit_cmd_pair(out: &mut String, cmd: char, p: &LayoutPoint) {
    out.push(cmd);
    fmt_path_into(out, p.x);
    out.push(',');
    fmt_path_into(out, p.y);
}

fn emit_pair(out: &mut String, p: &LayoutPoint) {
    fmt_path_into(out, p.x);
    out.push(',');
    fmt_path_into(out, p.y);
}

/// `M start C c1 c2 end` for a four-point connector.
pub(super) fn cubic_path_d(points: &[LayoutPoint; 4]) -> String {
    let [start, c1, c2, end] = points;
    let mut out = String::with_capacity(64);
    emit_cmd_pair(&mut out, 'M', start);
    out.push('C');
    emit_pair(&mut out, c1);
    out.push(' ');
    emit_pair(&mut out, c2);
    out.push(' ');
    emit_pair(&mut out, end);
    out
}
