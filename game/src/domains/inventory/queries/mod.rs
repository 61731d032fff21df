mod descendants;
