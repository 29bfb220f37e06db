use gridlife::grid::Grid;
use gridlife::render;
use gridlife::render::Renderer;
use gridlife::render::TextRenderer;

fn text(grid: &Grid) -> String {
    render::frame_lines(grid).join("\n")
}

#[test]
fn empty_3x3() {
    let grid = Grid::new(3, 3, &[]).unwrap();

    assert_eq!(
        render::frame(&grid),
        "-----------\n|         |\n|         |\n|         |\n-----------\n"
    );
}

#[test]
fn blinker_frames() {
    let mut grid = Grid::new(5, 5, &[(2, 1), (2, 2), (2, 3)]).unwrap();

    insta::assert_snapshot!(text(&grid), @r"
    -----------------
    |               |
    |       X       |
    |       X       |
    |       X       |
    |               |
    -----------------
    ");

    grid.advance();

    insta::assert_snapshot!(text(&grid), @r"
    -----------------
    |               |
    |               |
    |    X  X  X    |
    |               |
    |               |
    -----------------
    ");
}

#[test]
fn non_square_board() {
    let grid = Grid::new(4, 2, &[(0, 0), (3, 0), (1, 1)]).unwrap();

    insta::assert_snapshot!(text(&grid), @r"
    --------------
    | X        X |
    |    X       |
    --------------
    ");
}

#[test]
fn renderer_only_reads_the_grid() {
    let grid = Grid::new(2, 2, &[(1, 1)]).unwrap();
    let before: Vec<_> = grid.alive_cells().collect();

    let mut renderer = TextRenderer::new(Vec::new());
    renderer.render(&grid).unwrap();

    assert_eq!(grid.alive_cells().collect::<Vec<_>>(), before);
    assert_eq!(grid.generation(), 0);

    let out = String::from_utf8(renderer.into_inner()).unwrap();
    assert_eq!(out, "--------\n|      |\n|    X |\n--------\n");
}
