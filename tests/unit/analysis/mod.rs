mod tile_progress;
